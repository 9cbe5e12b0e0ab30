use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    AuthMissingToken,

    PlanReadFailed,
    PlanInvalid,

    ValidationPlanRejected,

    RemoteRequestFailed,
    RemoteApiError,

    RenameRetriesExhausted,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::AuthMissingToken => "auth.missing_token",

            ErrorCode::PlanReadFailed => "plan.read_failed",
            ErrorCode::PlanInvalid => "plan.invalid",

            ErrorCode::ValidationPlanRejected => "validation.plan_rejected",

            ErrorCode::RemoteRequestFailed => "remote.request_failed",
            ErrorCode::RemoteApiError => "remote.api_error",

            ErrorCode::RenameRetriesExhausted => "rename.retries_exhausted",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInvalidDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRejectedDetails {
    pub errors: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequestFailedDetails {
    pub method: String,
    pub error: String,
    pub timed_out: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteApiErrorDetails {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetriesExhaustedDetails {
    pub asis: String,
    pub tobe: String,
    pub attempts: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.clone(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid configuration value: {}", problem),
            details,
        )
    }

    pub fn auth_missing_token(env_var: &str) -> Self {
        Self::new(
            ErrorCode::AuthMissingToken,
            format!("{} environment variable is not set", env_var),
            serde_json::json!({ "envVar": env_var }),
        )
        .with_hint(format!(
            "Export a user token with channels:write scope as {} or pass --token",
            env_var
        ))
    }

    pub fn plan_read_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self::new(
            ErrorCode::PlanReadFailed,
            format!("failed to load plan: open {:?}: {}", path, error),
            serde_json::json!({ "path": path, "error": error }),
        )
    }

    /// Structural problem in the mapping file. `line` is the 1-based physical
    /// line number when the problem is tied to a row.
    pub fn plan_invalid(
        path: impl Into<String>,
        line: Option<usize>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let message = match line {
            Some(line) => format!("failed to load plan: line {}: {}", line, problem),
            None => format!("failed to load plan: {}", problem),
        };
        let details = to_details(PlanInvalidDetails {
            path: path.into(),
            line,
            problem,
        });

        Self::new(ErrorCode::PlanInvalid, message, details)
    }

    pub fn plan_rejected(errors: Vec<String>, skipped: Vec<String>) -> Self {
        let count = errors.len();
        let details = to_details(PlanRejectedDetails { errors, skipped });

        Self::new(
            ErrorCode::ValidationPlanRejected,
            format!("validation failed with {} error(s); no channels renamed", count),
            details,
        )
        .with_hint("Fix the mapping file and run again; nothing was changed")
    }

    pub fn remote_request_failed(
        method: impl Into<String>,
        error: impl Into<String>,
        timed_out: bool,
    ) -> Self {
        let method = method.into();
        let error = error.into();
        let message = format!("{}: request failed: {}", method, error);
        let details = to_details(RemoteRequestFailedDetails {
            method,
            error,
            timed_out,
        });

        Self::new(ErrorCode::RemoteRequestFailed, message, details)
    }

    pub fn remote_api_error(
        method: impl Into<String>,
        status: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        let method = method.into();
        let error = error.into();
        let message = format!("{}: {}", method, error);
        let details = to_details(RemoteApiErrorDetails {
            method,
            status,
            error,
        });

        Self::new(ErrorCode::RemoteApiError, message, details)
    }

    pub fn rename_retries_exhausted(attempts: u32, asis: &str, tobe: &str) -> Self {
        let details = to_details(RetriesExhaustedDetails {
            asis: asis.to_string(),
            tobe: tobe.to_string(),
            attempts,
        });

        let mut err = Self::new(
            ErrorCode::RenameRetriesExhausted,
            format!(
                "exceeded max retries ({}) for {} -> {}",
                attempts, asis, tobe
            ),
            details,
        );
        err.retryable = Some(true);
        err
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// Messages collected by a rejected validation, in plan order.
    pub fn rejected_messages(&self) -> Vec<String> {
        if self.code != ErrorCode::ValidationPlanRejected {
            return Vec::new();
        }
        self.details
            .get("errors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}
