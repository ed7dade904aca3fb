use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;

use super::integratorgenerator::{
    IntegrationMethod,
    IntegratorGenerator
};


fn get_integrator_generator_from_json(json_value: serde_json::Value) -> Result<IntegratorGenerator, ManagerError> {
    let generator: IntegratorGenerator = ManagerError::from_json_or_json_parse_error(json_value)?;
    if generator.method() == IntegrationMethod::IterativeLegendreGauss && generator.number_of_points().is_none() {
        return Err(ManagerError::json_missing_field("number_of_points"));
    }
    // 設定錯誤在載入時就回報，不等到 generate
    generator.policy()?;
    Ok(generator)
}


pub struct IntegratorGeneratorManager;


impl IntegratorGeneratorManager {
    pub fn new() -> Manager<IntegratorGenerator> {
        Manager::new(get_integrator_generator_from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::manager::IManager;
    use crate::math::integration::integrationerror::IntegrationError;

    #[test]
    fn loads_named_generators() {
        let manager = IntegratorGeneratorManager::new();
        manager.from_str(r#"[
            {"name": "fast", "method": "Simpson", "absolute_accuracy": 1e-8},
            {"name": "gauss", "method": "IterativeLegendreGauss", "number_of_points": 5}
        ]"#).unwrap();
        assert_eq!(manager.get("fast").unwrap().method(), IntegrationMethod::Simpson);
        assert_eq!(manager.get("gauss").unwrap().number_of_points(), Some(5));
    }

    #[test]
    fn gauss_requires_number_of_points() {
        let manager = IntegratorGeneratorManager::new();
        let result = manager.from_str(r#"{"name": "gauss", "method": "IterativeLegendreGauss"}"#);
        assert!(matches!(result, Err(ManagerError::JsonParseError(_))));
    }

    #[test]
    fn unknown_method_and_bad_policy_are_rejected() {
        let manager = IntegratorGeneratorManager::new();
        assert!(matches!(
            manager.from_str(r#"{"name": "x", "method": "Boole"}"#),
            Err(ManagerError::JsonParseError(_))
        ));
        assert!(matches!(
            manager.from_str(r#"{"name": "x", "method": "Romberg", "minimal_iteration_count": 5, "maximal_iteration_count": 4}"#),
            Err(ManagerError::IntegrationError(IntegrationError::MaximalBelowMinimal { minimal: 5, maximal: 4 }))
        ));
        assert!(manager.names().is_empty());
    }
}
