//! 运维命令行：迁移、创建管理员与数据清理
//!
//! 与服务端共用同一份配置（`config.toml` 与 `MUSIC_SCHOOL_*` 环境变量）。

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use music_school_admin::config::AppConfig;
use music_school_admin::errors::{Result, SchoolError};
use music_school_admin::models::users::entities::UserRole;
use music_school_admin::models::users::requests::CreateUserRequest;
use music_school_admin::storage::{
    AuthStorage, NotificationStorage, Storage, UserStorage, create_storage,
};
use music_school_admin::utils::password::hash_password;
use music_school_admin::utils::random_code::generate_random_password;
use music_school_admin::utils::validate::validate_email;

#[derive(Parser, Debug)]
#[command(
    name = "school-admin",
    version,
    about = "Maintenance commands for the music school backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create an admin account, or grant the admin role to an existing one
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        /// Generated and printed when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete expired or revoked refresh tokens
    CleanupTokens,

    /// Delete read notifications older than the given number of days
    CleanupNotifications {
        #[arg(long, default_value_t = 30)]
        older_than_days: i64,
    },
}

async fn create_admin(
    storage: &dyn Storage,
    email: String,
    name: String,
    password: Option<String>,
) -> Result<()> {
    let email = email.trim().to_lowercase();
    validate_email(&email).map_err(SchoolError::validation)?;

    if let Some(user) = storage.get_user_by_email(&email).await? {
        if user.roles.contains(&UserRole::Admin) {
            info!("User {} is already an admin", email);
            return Ok(());
        }
        let mut roles = user.roles.clone();
        roles.push(UserRole::Admin);
        storage.replace_user_roles(user.id, roles).await?;
        info!("Granted admin role to existing user {} (ID: {})", email, user.id);
        return Ok(());
    }

    let password = match password {
        Some(password) => password,
        None => {
            let generated = generate_random_password(16);
            println!("Generated password for {email}: {generated}");
            generated
        }
    };

    let user = storage
        .create_user(CreateUserRequest {
            email,
            password: Some(hash_password(&password)?),
            display_name: name.trim().to_string(),
            avatar_url: None,
            roles: vec![UserRole::Admin],
        })
        .await?;
    info!("Admin account created (ID: {}, email: {})", user.id, user.email);
    Ok(())
}

async fn run(command: Commands) -> Result<()> {
    // 建立连接时会自动执行待处理的迁移
    let storage = create_storage().await?;

    match command {
        Commands::Migrate => {
            info!("Database is up to date");
        }
        Commands::CreateAdmin {
            email,
            name,
            password,
        } => {
            create_admin(storage.as_ref(), email, name, password).await?;
        }
        Commands::CleanupTokens => {
            let removed = storage
                .cleanup_refresh_tokens(chrono::Utc::now().timestamp())
                .await?;
            info!("Removed {} refresh token(s)", removed);
        }
        Commands::CleanupNotifications { older_than_days } => {
            if older_than_days < 0 {
                return Err(SchoolError::validation("older-than-days 不能为负数"));
            }
            let before = chrono::Utc::now() - chrono::Duration::days(older_than_days);
            let removed = storage
                .cleanup_read_notifications(before.timestamp())
                .await?;
            info!("Removed {} read notification(s)", removed);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return ExitCode::FAILURE;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&AppConfig::get().app.log_level))
        .init();

    // SeaORM 的 rustls 连接需要全局加密实现
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("school-admin: {e}");
            ExitCode::FAILURE
        }
    }
}
