use crate::{
    application::{
        dto::{SessionSubject, SessionTokenDto},
        error::{ApplicationError, ApplicationResult},
        ports::{
            security::{PasswordHasher, SessionManager},
            time::Clock,
        },
    },
    domain::user::{NewUser, PasswordHash, Role, UserRepository, Username},
};
use std::{collections::HashSet, sync::Arc};

#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    session_manager: Arc<dyn SessionManager>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        session_manager: Arc<dyn SessionManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            session_manager,
            clock,
        }
    }

    pub async fn login(&self, command: LoginCommand) -> ApplicationResult<SessionTokenDto> {
        let username = Username::new(command.username)
            .map_err(|_| ApplicationError::unauthorized("invalid credentials"))?;

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        if !user.is_active {
            return Err(ApplicationError::unauthorized("account disabled"));
        }

        self.password_hasher
            .verify(&command.password, user.password_hash.as_str())
            .await?;

        let session = self.session_manager.issue(SessionSubject {
            user_id: user.id,
            username: user.username.to_string(),
            roles: user.roles,
        })?;

        tracing::info!(user_id = i64::from(user.id), "login succeeded");
        Ok(session)
    }

    /// Create the default accounts on an empty database. Passwords come
    /// from the environment; with neither configured this is a no-op.
    pub async fn seed_default_users(
        &self,
        admin_password: Option<&str>,
        super_admin_password: Option<&str>,
    ) -> ApplicationResult<()> {
        if self.user_repo.count().await? > 0 {
            return Ok(());
        }

        let accounts = [
            ("admin", admin_password, HashSet::from([Role::Admin])),
            (
                "root",
                super_admin_password,
                HashSet::from([Role::Admin, Role::SuperAdmin]),
            ),
        ];

        for (name, password, roles) in accounts {
            let Some(password) = password else {
                tracing::warn!(username = name, "bootstrap password not set, skipping");
                continue;
            };

            let username = Username::new(name)?;
            let hash = PasswordHash::new(self.password_hasher.hash(password).await?)?;
            let user = self
                .user_repo
                .insert(NewUser::new(username, hash, roles, self.clock.now()))
                .await?;
            tracing::info!(user_id = i64::from(user.id), username = name, "seeded user");
        }

        Ok(())
    }
}
