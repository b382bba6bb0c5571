use std::io;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = core::result::Result<T, Error>;

/// 错误分类
///
/// 调用方依据 [`ErrorKind`] 决定行为，而不是比较错误文本。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    DuplicateSubmission,
    NotFound,
    ExternalServiceFailure,
    AuthorizationFailed,
    Internal,
}

/// 重复提交的对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Comment,
    Reply,
    Subscriber,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{}", duplicate_message(.0))]
    Duplicate(Submission),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{service}: {reason}")]
    ExternalService {
        service: &'static str,
        reason: String,
    },

    #[error("Invalid admin password")]
    Unauthorized,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

fn duplicate_message(what: &Submission) -> &'static str {
    match what {
        Submission::Comment => "This comment has already been posted",
        Submission::Reply => "This reply has already been posted",
        Submission::Subscriber => "You are already a subscriber",
    }
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn external(service: &'static str, reason: impl ToString) -> Self {
        Error::ExternalService {
            service,
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::ValidationFailed,
            Error::Duplicate(_) => ErrorKind::DuplicateSubmission,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::ExternalService { .. } => ErrorKind::ExternalServiceFailure,
            Error::Unauthorized => ErrorKind::AuthorizationFailed,
            // 表单本身无法解析属于用户可修正的错误
            Error::Multipart(_) => ErrorKind::ValidationFailed,
            Error::Sqlx(_) | Error::Io(_) | Error::Template(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::ValidationFailed | ErrorKind::DuplicateSubmission => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ErrorKind::NotFound => {
                tracing::debug!(error = %self, "not found");
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            ErrorKind::AuthorizationFailed => {
                tracing::warn!("rejected admin credential");
                (StatusCode::FORBIDDEN, self.to_string()).into_response()
            }
            ErrorKind::ExternalServiceFailure => {
                tracing::error!(error = %self, "external service error");
                // 上游的错误详情只记日志，不回显给访问者
                let service = match &self {
                    Error::ExternalService { service, .. } => *service,
                    _ => "external service",
                };
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{service} is unavailable, try again later"),
                )
                    .into_response()
            }
            ErrorKind::Internal => {
                tracing::error!(error = %self, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, try again later",
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_to_status() {
        let cases = [
            (Error::validation("title", "bad"), StatusCode::BAD_REQUEST),
            (Error::Duplicate(Submission::Comment), StatusCode::BAD_REQUEST),
            (Error::not_found("post", "x"), StatusCode::NOT_FOUND),
            (Error::Unauthorized, StatusCode::FORBIDDEN),
            (Error::external("smtp", "down"), StatusCode::BAD_GATEWAY),
            (
                Error::Io(io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_external_failure_hides_reason() {
        let err = Error::external(
            "email verification",
            "error sending request for url (http://host/api/check?access_key=SECRET)",
        );
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        let body = String::from_utf8(body.to_vec()).expect("读取数据失败");
        assert_eq!(body, "email verification is unavailable, try again later");
    }

    #[test]
    fn test_not_found_is_distinct_from_internal() {
        assert_eq!(Error::not_found("post", "x").kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::Sqlx(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_duplicate_message() {
        assert_eq!(
            Error::Duplicate(Submission::Subscriber).to_string(),
            "You are already a subscriber"
        );
    }
}
