use clap::Args;
use storefront_app::{
    auth::{DEFAULT_ACCESS_TTL, DEFAULT_RESET_TTL, NewUser, Password, PgAuthService, TokenIssuer},
    database::{self, Db},
    domain::users::Role,
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login email address
    #[arg(long)]
    email: String,

    /// Initial password
    #[arg(long, env = "STOREFRONT_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Grant the admin role
    #[arg(long)]
    admin: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    // No token is issued here, so the signing secret is irrelevant.
    let service = PgAuthService::new(
        Db::new(pool),
        TokenIssuer::new(&[], DEFAULT_ACCESS_TTL, DEFAULT_RESET_TTL),
    );

    let role = if args.admin { Role::Admin } else { Role::User };

    let user = service
        .create_user(NewUser {
            name: args.name,
            email: args.email,
            password: Password::new(args.password),
            role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);

    Ok(())
}
