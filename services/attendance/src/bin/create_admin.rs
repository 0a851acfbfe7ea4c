//! Bootstrap an account directly against the database, typically the first admin.

use anyhow::Context as _;
use clap::Parser;
use sea_orm::Database;

use rollcall_attendance::infra::db::DbUserRepository;
use rollcall_attendance::usecase::user::{CreateUserInput, CreateUserUseCase};
use rollcall_core::tracing::init_tracing;
use rollcall_domain::user::UserRole;

#[derive(Debug, Parser)]
#[command(name = "create-admin", about = "Create a user account, an admin by default")]
struct Args {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, default_value = "admin")]
    role: UserRole,

    /// Required when `--role student`.
    #[arg(long)]
    roll_number: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;

    let usecase = CreateUserUseCase {
        repo: DbUserRepository { db },
    };
    let created = usecase
        .execute(CreateUserInput {
            name: Some(args.name),
            email: Some(args.email),
            password: Some(args.password),
            role: Some(args.role),
            roll_number: args.roll_number,
            ..Default::default()
        })
        .await
        .context("failed to create user")?;

    println!(
        "created {} {} <{}>",
        created.user.role, created.user.id, created.user.email
    );
    Ok(())
}
