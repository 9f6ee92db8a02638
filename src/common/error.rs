use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Order/Quote ID já existe")]
    OrderQuoteIdAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Acesso restrito a administradores")]
    AdminOnly,

    // O erase-all exige uma exportação recente (guarda branda, não é
    // fronteira de segurança)
    #[error("Exportação recente exigida antes de apagar")]
    ExportRequired,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "This e-mail is already in use."),
            AppError::OrderQuoteIdAlreadyExists => {
                (StatusCode::CONFLICT, "This Order/Quote ID is already in use.")
            }
            // Mesma mensagem para e-mail desconhecido e senha errada,
            // para não permitir enumeração de usuários.
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password."),
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Invalid or missing authentication token.")
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found."),
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "Order not found."),
            AppError::AdminOnly => (StatusCode::FORBIDDEN, "Admin access required."),
            AppError::ExportRequired => (
                StatusCode::CONFLICT,
                "You must export data within the last 24 hours before erasing.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
