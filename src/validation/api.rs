use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use super::error::ValidationError;
use crate::cloud::CloudCredentials;
use crate::models::api::{
    AUTOSCALING_KEY, COMPUTE_KEY, CPU_KEY, IMAGE_KEY, LOCAL_PORT_KEY, MAX_REPLICAS_KEY,
    MAX_SURGE_KEY, MAX_UNAVAILABLE_KEY, MIN_REPLICAS_KEY, MODEL_KEY, NAME_KEY, PATH_KEY,
    PREDICTOR_KEY, PYTHON_PATH_KEY, UPDATE_STRATEGY_KEY,
};
use crate::models::{Api, PredictorType};
use crate::project::ProjectFileResolver;
use crate::providers::ProviderType;

static API_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").expect("valid api name pattern"));

pub const DEFAULT_IMAGE_REGISTRY: &str = "apigate";

/// Validates a single declaration for a given execution environment.
///
/// Implementations may fill in defaults on the declaration. File references
/// must only be dereferenced through `project_files`.
pub trait ApiValidator {
    fn validate_api(
        &self,
        api: &mut Api,
        project_files: &dyn ProjectFileResolver,
        provider: ProviderType,
        credentials: &CloudCredentials,
    ) -> Result<(), ValidationError>;
}

impl<T: ApiValidator + ?Sized> ApiValidator for &T {
    fn validate_api(
        &self,
        api: &mut Api,
        project_files: &dyn ProjectFileResolver,
        provider: ProviderType,
        credentials: &CloudCredentials,
    ) -> Result<(), ValidationError> {
        (**self).validate_api(api, project_files, provider, credentials)
    }
}

/// Field-level rules for API declarations
#[derive(Debug, Clone, Default)]
pub struct SpecValidator;

impl SpecValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ApiValidator for SpecValidator {
    fn validate_api(
        &self,
        api: &mut Api,
        project_files: &dyn ProjectFileResolver,
        provider: ProviderType,
        credentials: &CloudCredentials,
    ) -> Result<(), ValidationError> {
        debug!("Validating {} for {provider}", api.identify());

        validate_name(api)?;
        validate_local_port(api, provider)?;
        validate_predictor(api, project_files, credentials)?;
        validate_compute(api)?;

        if !provider.is_local() {
            validate_autoscaling(api)?;
            validate_update_strategy(api)?;
        }

        set_default_image(api);
        Ok(())
    }
}

fn nested_key(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

fn validate_name(api: &Api) -> Result<(), ValidationError> {
    if !API_NAME_PATTERN.is_match(&api.name) {
        return Err(ValidationError::invalid(
            api,
            NAME_KEY,
            format!(
                "'{}' must contain only lower case alphanumeric characters or '-', start with a letter, and end with an alphanumeric character",
                api.name
            ),
        ));
    }
    Ok(())
}

fn validate_local_port(api: &Api, provider: ProviderType) -> Result<(), ValidationError> {
    let Some(port) = api.local_port else {
        return Ok(());
    };

    if !provider.is_local() {
        return Err(ValidationError::invalid(
            api,
            LOCAL_PORT_KEY,
            format!("key is not supported in the {provider} environment"),
        ));
    }
    if port == 0 {
        return Err(ValidationError::invalid(
            api,
            LOCAL_PORT_KEY,
            "must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_predictor(
    api: &Api,
    project_files: &dyn ProjectFileResolver,
    credentials: &CloudCredentials,
) -> Result<(), ValidationError> {
    let predictor = &api.predictor;

    let path_key = nested_key(PREDICTOR_KEY, PATH_KEY);
    if Path::new(&predictor.path).extension().and_then(|e| e.to_str()) != Some("py") {
        return Err(ValidationError::invalid(
            api,
            path_key,
            format!("'{}' must be a python file (.py)", predictor.path),
        ));
    }
    // Reading the file proves it belongs to the project
    project_files
        .get_file(&predictor.path)
        .map_err(|e| ValidationError::api_file(api, path_key, e))?;

    if let Some(python_path) = &predictor.python_path {
        let dir = project_files.resolve_path(python_path);
        let in_project = dir.starts_with(project_files.base_dir());
        let has_files = project_files
            .get_all_paths()
            .iter()
            .any(|path| path != &dir && path.starts_with(&dir));
        if !in_project || !has_files {
            return Err(ValidationError::invalid(
                api,
                nested_key(PREDICTOR_KEY, PYTHON_PATH_KEY),
                format!("'{python_path}' is not a project directory containing project files"),
            ));
        }
    }

    if let Some(image) = &predictor.image
        && image.trim().is_empty()
    {
        return Err(ValidationError::invalid(
            api,
            nested_key(PREDICTOR_KEY, IMAGE_KEY),
            "must not be empty",
        ));
    }

    let model_key = nested_key(PREDICTOR_KEY, MODEL_KEY);
    match (predictor.predictor_type, &predictor.model) {
        (PredictorType::Python, Some(_)) => {
            return Err(ValidationError::invalid(
                api,
                model_key,
                "key is not supported for python predictors",
            ));
        }
        (PredictorType::Python, None) => {}
        (predictor_type, None) => {
            return Err(ValidationError::invalid(
                api,
                model_key,
                format!("key is required for {predictor_type} predictors"),
            ));
        }
        (predictor_type, Some(model)) => {
            if predictor_type == PredictorType::Onnx && !model.ends_with(".onnx") {
                return Err(ValidationError::invalid(
                    api,
                    model_key,
                    format!("'{model}' must be an onnx model file (.onnx)"),
                ));
            }
            if model.starts_with("s3://") && !credentials.is_configured() {
                return Err(ValidationError::invalid(
                    api,
                    model_key,
                    format!("'{model}' cannot be accessed without AWS credentials"),
                ));
            }
        }
    }

    Ok(())
}

fn validate_compute(api: &Api) -> Result<(), ValidationError> {
    if let Some(cpu) = api.compute.as_ref().and_then(|c| c.cpu)
        && (!cpu.is_finite() || cpu <= 0.0)
    {
        return Err(ValidationError::invalid(
            api,
            nested_key(COMPUTE_KEY, CPU_KEY),
            format!("{cpu} must be a finite number greater than 0"),
        ));
    }
    Ok(())
}

fn validate_autoscaling(api: &Api) -> Result<(), ValidationError> {
    let Some(autoscaling) = &api.autoscaling else {
        return Ok(());
    };

    if autoscaling.min_replicas == 0 {
        return Err(ValidationError::invalid(
            api,
            nested_key(AUTOSCALING_KEY, MIN_REPLICAS_KEY),
            "must be greater than 0",
        ));
    }
    if autoscaling.min_replicas > autoscaling.max_replicas {
        return Err(ValidationError::invalid(
            api,
            nested_key(AUTOSCALING_KEY, MIN_REPLICAS_KEY),
            format!(
                "{} must be less than or equal to {} ({})",
                autoscaling.min_replicas, MAX_REPLICAS_KEY, autoscaling.max_replicas
            ),
        ));
    }
    Ok(())
}

fn validate_update_strategy(api: &Api) -> Result<(), ValidationError> {
    let Some(strategy) = &api.update_strategy else {
        return Ok(());
    };

    let surge = parse_update_amount(api, MAX_SURGE_KEY, &strategy.max_surge)?;
    let unavailable = parse_update_amount(api, MAX_UNAVAILABLE_KEY, &strategy.max_unavailable)?;
    if surge == 0 && unavailable == 0 {
        return Err(ValidationError::invalid(
            api,
            UPDATE_STRATEGY_KEY,
            format!("{MAX_SURGE_KEY} and {MAX_UNAVAILABLE_KEY} cannot both be 0"),
        ));
    }
    Ok(())
}

/// Accepts a replica count ("2") or a percentage ("25%")
fn parse_update_amount(api: &Api, key: &str, value: &str) -> Result<u32, ValidationError> {
    let (number, is_percentage) = match value.strip_suffix('%') {
        Some(number) => (number, true),
        None => (value, false),
    };

    match number.trim().parse::<u32>() {
        Ok(amount) if !is_percentage || amount <= 100 => Ok(amount),
        _ => Err(ValidationError::invalid(
            api,
            nested_key(UPDATE_STRATEGY_KEY, key),
            format!("'{value}' must be a non-negative integer or a percentage between 0% and 100%"),
        )),
    }
}

fn set_default_image(api: &mut Api) {
    if api.predictor.image.is_some() {
        return;
    }

    let device = if api.compute.as_ref().is_some_and(|c| c.gpu > 0) {
        "gpu"
    } else {
        "cpu"
    };
    let image = format!(
        "{DEFAULT_IMAGE_REGISTRY}/{}-predictor-{device}",
        api.predictor.predictor_type
    );
    debug!("Using default image {image} for {}", api.name);
    api.predictor.image = Some(image);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Autoscaling, Compute, Predictor, UpdateStrategy};
    use crate::project::ProjectFileSet;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, ProjectFileSet) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("lib")).unwrap();
        fs::write(temp_dir.path().join("predictor.py"), "class PythonPredictor: pass").unwrap();
        fs::write(temp_dir.path().join("lib/util.py"), "X = 1").unwrap();
        fs::write(temp_dir.path().join("secret.py"), "TOKEN = 1").unwrap();

        let file_set = ProjectFileSet::with_base_dir(
            temp_dir.path(),
            ["predictor.py", "lib/util.py"],
        );
        (temp_dir, file_set)
    }

    fn validate(api: &mut Api, provider: ProviderType) -> Result<(), ValidationError> {
        validate_with(api, provider, &CloudCredentials::anonymous())
    }

    fn validate_with(
        api: &mut Api,
        provider: ProviderType,
        credentials: &CloudCredentials,
    ) -> Result<(), ValidationError> {
        let (_temp_dir, file_set) = project();
        SpecValidator::new().validate_api(api, &file_set, provider, credentials)
    }

    fn python_api(name: &str) -> Api {
        Api::new(name, Predictor::python("predictor.py"))
    }

    fn invalid_key(result: Result<(), ValidationError>) -> String {
        match result {
            Err(ValidationError::InvalidApi { key, .. }) => key,
            other => panic!("expected InvalidApi, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_python_api_gets_default_image() {
        let mut api = python_api("iris-classifier");
        validate(&mut api, ProviderType::Local).unwrap();
        assert_eq!(
            api.predictor.image.as_deref(),
            Some("apigate/python-predictor-cpu")
        );

        let mut gpu_api = python_api("iris-gpu");
        gpu_api.compute = Some(Compute {
            gpu: 1,
            ..Compute::default()
        });
        validate(&mut gpu_api, ProviderType::Local).unwrap();
        assert_eq!(
            gpu_api.predictor.image.as_deref(),
            Some("apigate/python-predictor-gpu")
        );
    }

    #[test]
    fn test_explicit_image_is_kept() {
        let mut api = python_api("iris");
        api.predictor.image = Some("registry.example.com/custom:1".to_string());
        validate(&mut api, ProviderType::Local).unwrap();
        assert_eq!(
            api.predictor.image.as_deref(),
            Some("registry.example.com/custom:1")
        );
    }

    #[test]
    fn test_invalid_names() {
        for name in ["Iris", "1iris", "iris-", "iris_classifier", ""] {
            let mut api = python_api(name);
            assert_eq!(invalid_key(validate(&mut api, ProviderType::Local)), NAME_KEY);
        }
    }

    #[test]
    fn test_predictor_outside_project() {
        let mut api = Api::new("iris", Predictor::python("secret.py"));
        let err = validate(&mut api, ProviderType::Local).unwrap_err();
        match err {
            ValidationError::ApiFile { key, source, .. } => {
                assert_eq!(key, "predictor.path");
                assert!(matches!(
                    source,
                    crate::project::ProjectFileError::FileNotInProject { .. }
                ));
            }
            other => panic!("expected ApiFile, got {other:?}"),
        }
    }

    #[test]
    fn test_predictor_must_be_python_file() {
        let mut api = Api::new("iris", Predictor::python("lib"));
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.path"
        );
    }

    #[test]
    fn test_python_path_must_contain_project_files() {
        let mut api = python_api("iris");
        api.predictor.python_path = Some("lib".to_string());
        validate(&mut api, ProviderType::Local).unwrap();

        let mut api = python_api("iris");
        api.predictor.python_path = Some("vendor".to_string());
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.python_path"
        );
    }

    #[test]
    fn test_python_path_must_stay_in_project() {
        for python_path in ["..", "../..", "/", "lib/../.."] {
            let mut api = python_api("iris");
            api.predictor.python_path = Some(python_path.to_string());
            assert_eq!(
                invalid_key(validate(&mut api, ProviderType::Local)),
                "predictor.python_path",
                "{python_path} should be rejected"
            );
        }

        let mut api = python_api("iris");
        api.predictor.python_path = Some(".".to_string());
        validate(&mut api, ProviderType::Local).unwrap();
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let mut api = python_api("iris");
        api.predictor.image = Some("  ".to_string());
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.image"
        );
    }

    #[test]
    fn test_model_rules() {
        let mut api = python_api("iris");
        api.predictor.model = Some("model.onnx".to_string());
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.model"
        );

        let mut api = python_api("iris");
        api.predictor.predictor_type = PredictorType::TensorFlow;
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.model"
        );

        let mut api = python_api("iris");
        api.predictor.predictor_type = PredictorType::Onnx;
        api.predictor.model = Some("models/iris.pb".to_string());
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.model"
        );

        let mut api = python_api("iris");
        api.predictor.predictor_type = PredictorType::Onnx;
        api.predictor.model = Some("models/iris.onnx".to_string());
        validate(&mut api, ProviderType::Local).unwrap();
        assert_eq!(
            api.predictor.image.as_deref(),
            Some("apigate/onnx-predictor-cpu")
        );
    }

    #[test]
    fn test_s3_model_requires_credentials() {
        let mut api = python_api("iris");
        api.predictor.predictor_type = PredictorType::TensorFlow;
        api.predictor.model = Some("s3://models/iris".to_string());
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "predictor.model"
        );

        let credentials = CloudCredentials::new("AKIA123", "secret", None);
        validate_with(&mut api, ProviderType::Local, &credentials).unwrap();
    }

    #[test]
    fn test_local_port_rules() {
        let mut api = python_api("iris");
        api.local_port = Some(0);
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            LOCAL_PORT_KEY
        );

        let mut api = python_api("iris");
        api.local_port = Some(8890);
        validate(&mut api, ProviderType::Local).unwrap();
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Aws)),
            LOCAL_PORT_KEY
        );
    }

    #[test]
    fn test_cpu_must_be_positive() {
        let mut api = python_api("iris");
        api.compute = Some(Compute {
            cpu: Some(0.0),
            ..Compute::default()
        });
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Local)),
            "compute.cpu"
        );

        for cpu in [f64::NAN, f64::INFINITY, -1.0] {
            let mut api = python_api("iris");
            api.compute = Some(Compute {
                cpu: Some(cpu),
                ..Compute::default()
            });
            assert_eq!(
                invalid_key(validate(&mut api, ProviderType::Local)),
                "compute.cpu"
            );
        }
    }

    #[test]
    fn test_cloud_rules_only_apply_to_aws() {
        let mut api = python_api("iris");
        api.autoscaling = Some(Autoscaling {
            min_replicas: 5,
            max_replicas: 2,
            target_replica_concurrency: None,
        });
        validate(&mut api, ProviderType::Local).unwrap();
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Aws)),
            "autoscaling.min_replicas"
        );
    }

    #[test]
    fn test_update_strategy_rules() {
        let strategy = |surge: &str, unavailable: &str| UpdateStrategy {
            max_surge: surge.to_string(),
            max_unavailable: unavailable.to_string(),
        };

        let mut api = python_api("iris");
        api.update_strategy = Some(strategy("0", "0%"));
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Aws)),
            UPDATE_STRATEGY_KEY
        );

        api.update_strategy = Some(strategy("150%", "0"));
        assert_eq!(
            invalid_key(validate(&mut api, ProviderType::Aws)),
            "update_strategy.max_surge"
        );

        api.update_strategy = Some(strategy("1", "25%"));
        validate(&mut api, ProviderType::Aws).unwrap();
    }
}
