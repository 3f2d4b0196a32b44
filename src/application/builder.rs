use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::api::router::AppState;
use crate::application::{
    oauth::{OAuthFlow, SessionIssuer},
    ports::{AppointmentRepository, IdentityProvider, StaffRepository, UserRepository},
    use_cases::{
        CreateAppointmentUseCase, DeleteAppointmentUseCase, DisableMfaUseCase,
        GetAppointmentUseCase, ListAppointmentsUseCase, SetupMfaUseCase,
        UpdateAppointmentUseCase, VerifyMfaUseCase,
    },
};
use crate::config::Config;
use crate::infrastructure::{
    identity::HttpIdentityProvider,
    persistence::{
        InMemoryAppointmentRepository, InMemoryStaffRepository, InMemoryUserRepository,
        PostgresAppointmentRepository, PostgresStaffRepository, PostgresUserRepository,
    },
};

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<sqlx::PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    staff_repo: Option<Arc<dyn StaffRepository>>,
    appointment_repo: Option<Arc<dyn AppointmentRepository>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            user_repo: None,
            staff_repo: None,
            appointment_repo: None,
            identity_provider: None,
        }
    }

    /// Initialize database connection pool with retry logic.
    ///
    /// Without `DATABASE_URL` this is a no-op and the in-memory repositories
    /// are used instead.
    pub async fn with_database(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(database_url) = self.config.database_url.clone() else {
            warn!("DATABASE_URL not set, using in-memory repositories; data is lost on restart");
            return Ok(self);
        };

        info!("Connecting to database");

        // Retry connection with exponential backoff
        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .idle_timeout(Some(Duration::from_secs(self.config.db_idle_timeout_secs)))
                .max_lifetime(Some(Duration::from_secs(self.config.db_max_lifetime_secs)))
                .connect(&database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay, retries, e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs,
            self.config.db_idle_timeout_secs,
            self.config.db_max_lifetime_secs
        );

        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;

        self.pool = Some(pool);
        Ok(self)
    }

    /// Use the given repositories instead of building them from the pool
    pub fn with_repositories(
        mut self,
        users: Arc<dyn UserRepository>,
        staff: Arc<dyn StaffRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        self.user_repo = Some(users);
        self.staff_repo = Some(staff);
        self.appointment_repo = Some(appointments);
        self
    }

    /// Use the given identity provider instead of the HTTP one
    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    /// Initialize infrastructure layer (repositories and identity provider)
    pub fn with_infrastructure(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        if self.appointment_repo.is_none() {
            match &self.pool {
                Some(pool) => {
                    self.user_repo = Some(Arc::new(PostgresUserRepository::new(pool.clone())));
                    self.staff_repo = Some(Arc::new(PostgresStaffRepository::new(pool.clone())));
                    self.appointment_repo =
                        Some(Arc::new(PostgresAppointmentRepository::new(pool.clone())));
                }
                None => {
                    self.user_repo = Some(Arc::new(InMemoryUserRepository::new()));
                    self.staff_repo = Some(Arc::new(InMemoryStaffRepository::new()));
                    self.appointment_repo = Some(Arc::new(InMemoryAppointmentRepository::new()));
                }
            }
        }

        if self.identity_provider.is_none() {
            let provider = HttpIdentityProvider::from_config(&self.config)?;
            self.identity_provider = Some(Arc::new(provider));
        }

        info!(
            persistence = if self.pool.is_some() { "postgres" } else { "in_memory" },
            "Infrastructure layer initialized"
        );
        Ok(self)
    }

    /// Build application state with all use cases
    pub fn build(self) -> Result<AppState, Box<dyn std::error::Error>> {
        let user_repo = self.user_repo.ok_or("User repository not initialized")?;
        let staff_repo = self.staff_repo.ok_or("Staff repository not initialized")?;
        let appointment_repo = self
            .appointment_repo
            .ok_or("Appointment repository not initialized")?;
        let identity_provider = self
            .identity_provider
            .ok_or("Identity provider not initialized")?;

        let sessions = SessionIssuer::new(&self.config.jwt_secret, self.config.session_ttl_hours);

        let oauth_flow = Arc::new(OAuthFlow::new(
            self.config.oauth_settings(),
            identity_provider,
            Arc::clone(&user_repo),
            staff_repo,
            sessions.clone(),
        ));

        info!("Application layer initialized");

        Ok(AppState {
            pool: self.pool.map(Arc::new),
            create_appointment_use_case: Arc::new(CreateAppointmentUseCase::new(Arc::clone(
                &appointment_repo,
            ))),
            list_appointments_use_case: Arc::new(ListAppointmentsUseCase::new(Arc::clone(
                &appointment_repo,
            ))),
            get_appointment_use_case: Arc::new(GetAppointmentUseCase::new(Arc::clone(
                &appointment_repo,
            ))),
            update_appointment_use_case: Arc::new(UpdateAppointmentUseCase::new(Arc::clone(
                &appointment_repo,
            ))),
            delete_appointment_use_case: Arc::new(DeleteAppointmentUseCase::new(
                appointment_repo,
            )),
            setup_mfa_use_case: Arc::new(SetupMfaUseCase::new(
                Arc::clone(&user_repo),
                self.config.mfa_issuer.clone(),
            )),
            verify_mfa_use_case: Arc::new(VerifyMfaUseCase::new(Arc::clone(&user_repo))),
            disable_mfa_use_case: Arc::new(DisableMfaUseCase::new(user_repo)),
            oauth_flow,
            sessions: Arc::new(sessions),
            config: Arc::new(self.config),
        })
    }
}
