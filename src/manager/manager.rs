use std::cell::{
    RefCell, RefMut
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use super::managererror::ManagerError;
use super::namedobject::NamedJsonObject;


/// 以名稱登錄、由 JSON 建立的物件表。
pub trait IManager<V> where
    V: Clone {
    fn map(&self) -> RefMut<'_, HashMap<String, V>>;

    /// 解析一個 JSON 物件，回傳名稱與物件，不寫入表中。
    fn obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError>;

    fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let (name, v) = self.obj_from_json(json_value)?;
        self.map().insert(name, v);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        let map = self.map();
        map.get(name)
            .cloned()
            .ok_or_else(|| ManagerError::map_elem_not_found(name))
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map().keys().cloned().collect();
        names.sort();
        names
    }

    /// 全部解析成功後才寫入；任一項失敗時表不變。
    fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<(), ManagerError> {
        let objs = json_vec.iter()
            .map(|j| self.obj_from_json(j.clone()))
            .collect::<Result<Vec<(String, V)>, ManagerError>>()?;
        self.map().extend(objs);
        Ok(())
    }

    /// 接受單一物件或物件陣列。
    fn insert_from_json_value(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        match json_value {
            serde_json::Value::Array(json_array) => self.insert_obj_from_json_vec(&json_array),
            json_value => self.insert_obj_from_json(json_value)
        }
    }

    fn from_reader(&self, file_path: &str) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        self.insert_from_json_value(json_value)
    }

    fn from_str(&self, json: &str) -> Result<(), ManagerError> {
        let json_value: serde_json::Value = serde_json::from_str(json)?;
        self.insert_from_json_value(json_value)
    }
}


pub struct Manager<V> {
    map_cell: RefCell<HashMap<String, V>>,
    get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>
}


impl <V> Manager<V> where
    V: Clone {
    pub fn new(get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>) -> Manager<V> {
        Manager {map_cell: RefCell::new(HashMap::new()), get_obj_from_json}
    }
}

impl <V> IManager<V> for Manager<V> where
    V: Clone {
    fn map(&self) -> RefMut<'_, HashMap<String, V>> {
        self.map_cell.borrow_mut()
    }

    fn obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError> {
        let named_object: NamedJsonObject = ManagerError::from_json_or_json_parse_error(json_value.clone())?;
        let v = (self.get_obj_from_json)(json_value)?;
        Ok((named_object.name().to_owned(), v))
    }
}
