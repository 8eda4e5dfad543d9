use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const NAME_KEY: &str = "name";
pub const LOCAL_PORT_KEY: &str = "local_port";
pub const ENDPOINT_KEY: &str = "endpoint";
pub const AUTOSCALING_KEY: &str = "autoscaling";
pub const TRACKER_KEY: &str = "tracker";
pub const UPDATE_STRATEGY_KEY: &str = "update_strategy";
pub const PREDICTOR_KEY: &str = "predictor";
pub const COMPUTE_KEY: &str = "compute";

pub const PATH_KEY: &str = "path";
pub const MODEL_KEY: &str = "model";
pub const PYTHON_PATH_KEY: &str = "python_path";
pub const IMAGE_KEY: &str = "image";
pub const CPU_KEY: &str = "cpu";
pub const MIN_REPLICAS_KEY: &str = "min_replicas";
pub const MAX_REPLICAS_KEY: &str = "max_replicas";
pub const MAX_SURGE_KEY: &str = "max_surge";
pub const MAX_UNAVAILABLE_KEY: &str = "max_unavailable";

/// Keys that are accepted in a declaration but have no effect in the local environment
pub const LOCAL_UNSUPPORTED_KEYS: [&str; 4] = [
    ENDPOINT_KEY,
    AUTOSCALING_KEY,
    TRACKER_KEY,
    UPDATE_STRATEGY_KEY,
];

/// A single deployable API declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_port: Option<u16>,

    pub predictor: Predictor,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute: Option<Compute>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<Autoscaling>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<Tracker>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_strategy: Option<UpdateStrategy>,

    /// Configuration file the declaration was read from
    #[serde(skip)]
    pub file_path: Option<String>,

    /// Position of the declaration within its configuration file
    #[serde(skip)]
    pub index: Option<usize>,
}

impl Api {
    /// Create a declaration with only the required fields set
    pub fn new(name: impl Into<String>, predictor: Predictor) -> Self {
        Self {
            name: name.into(),
            local_port: None,
            predictor,
            compute: None,
            endpoint: None,
            autoscaling: None,
            tracker: None,
            update_strategy: None,
            file_path: None,
            index: None,
        }
    }

    /// Human-readable identity used to prefix errors about this declaration
    pub fn identify(&self) -> String {
        match (&self.file_path, self.index) {
            (Some(file), Some(index)) => {
                format!("{} (api at index {index} in {file})", self.name)
            }
            (None, Some(index)) => format!("{} (api at index {index})", self.name),
            (Some(file), None) => format!("{} (defined in {file})", self.name),
            (None, None) => self.name.clone(),
        }
    }

    /// Whether any field that only applies to cloud deployments is set
    pub fn uses_cloud_only_fields(&self) -> bool {
        self.endpoint.is_some()
            || self.autoscaling.is_some()
            || self.tracker.is_some()
            || self.update_strategy.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorType {
    Python,
    TensorFlow,
    Onnx,
}

impl fmt::Display for PredictorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorType::Python => write!(f, "python"),
            PredictorType::TensorFlow => write!(f, "tensorflow"),
            PredictorType::Onnx => write!(f, "onnx"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predictor {
    #[serde(rename = "type")]
    pub predictor_type: PredictorType,

    /// Path to the predictor implementation, relative to the project root
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, serde_yaml::Value>>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Predictor {
    pub fn python(path: impl Into<String>) -> Self {
        Self {
            predictor_type: PredictorType::Python,
            path: path.into(),
            model: None,
            python_path: None,
            config: None,
            env: HashMap::new(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,

    #[serde(default)]
    pub gpu: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autoscaling {
    #[serde(default = "default_min_replicas")]
    pub min_replicas: u32,

    #[serde(default = "default_max_replicas")]
    pub max_replicas: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_replica_concurrency: Option<f64>,
}

fn default_min_replicas() -> u32 {
    1
}

fn default_max_replicas() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    pub model_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStrategy {
    #[serde(default = "default_update_percentage")]
    pub max_surge: String,

    #[serde(default = "default_update_percentage")]
    pub max_unavailable: String,
}

fn default_update_percentage() -> String {
    "25%".to_string()
}
