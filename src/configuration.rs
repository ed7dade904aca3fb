use std::cell::{
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::math::integration::gauss::gaussintegratorfactory::GaussIntegratorFactory;
use crate::math::integration::integratorgenerator::IntegratorGenerator;
use crate::math::integration::integratorgeneratormanager::IntegratorGeneratorManager;
use crate::math::integration::univariateintegrator::UnivariateIntegrator;


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    integrator: Vec<serde_json::Value>
}

/// 具名積分器設定，以及所有 Gauss 類積分器共用的規則快取。
pub struct Configuration {
    integrator_generator_manager_cell: RefCell<Manager<IntegratorGenerator>>,
    gauss_integrator_factory: Arc<GaussIntegratorFactory>
}


impl Configuration {
    pub fn new() -> Configuration {
        Self::with_factory(Arc::new(GaussIntegratorFactory::new()))
    }

    pub fn with_factory(gauss_integrator_factory: Arc<GaussIntegratorFactory>) -> Configuration {
        Configuration {
            integrator_generator_manager_cell: RefCell::new(IntegratorGeneratorManager::new()),
            gauss_integrator_factory
        }
    }

    pub fn integrator_generator_manager(&self) -> RefMut<'_, Manager<IntegratorGenerator>> {
        self.integrator_generator_manager_cell.borrow_mut()
    }

    pub fn gauss_integrator_factory(&self) -> &Arc<GaussIntegratorFactory> {
        &self.gauss_integrator_factory
    }

    /// 依名稱產生一個新的積分器。
    pub fn integrator(&self, name: &str) -> Result<Box<dyn UnivariateIntegrator>, ManagerError> {
        let generator = self.integrator_generator_manager().get(name)?;
        Ok(generator.generate(&self.gauss_integrator_factory)?)
    }

    pub fn from_reader(&self, file_path: &str) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        self.insert_json_prop(json_prop)?;
        info!(file_path, integrators = self.integrator_generator_manager().names().len(), "configuration loaded");
        Ok(())
    }

    pub fn from_str(&self, json: &str) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        self.insert_json_prop(json_prop)?;
        info!(integrators = self.integrator_generator_manager().names().len(), "configuration loaded");
        Ok(())
    }

    fn insert_json_prop(&self, json_prop: ConfigurationJsonProp) -> Result<(), ManagerError> {
        let integrator_generator_manager = self.integrator_generator_manager_cell.borrow_mut();
        integrator_generator_manager.insert_obj_from_json_vec(&json_prop.integrator)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
