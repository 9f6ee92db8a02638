// src/config.rs

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};
use tokio::sync::RwLock;

use crate::{
    db::{OrderRepository, UserRepository},
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub user_repo: UserRepository,
    pub order_repo: OrderRepository,
    // Timestamp da última exportação CSV bem-sucedida. Arma a janela de
    // 24h do erase-all; vive só no processo, sem corroboração externa.
    pub last_export_at: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem
    // chama decide parar a aplicação.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            user_repo,
            order_repo,
            last_export_at: Arc::new(RwLock::new(None)),
        })
    }
}
