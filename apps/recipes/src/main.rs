use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AuthClient, ControllerEvent, FileSessionStore, HttpRecipeService, RecipeSyncController,
    SessionStore, SubmitOutcome,
};
use shared::domain::{Recipe, RecipeDraft, RecipeId};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, validate_base_url, ClientSettings};

#[derive(Parser, Debug)]
#[command(about = "Manage your recipes on the recipe service")]
struct Args {
    /// Config file; defaults to ./recipe-client.toml or the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    session_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// List all recipes.
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        steps: String,
    },
    /// Edit a recipe; omitted fields keep their current value.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        ingredients: Option<String>,
        #[arg(long)]
        steps: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        validate_base_url(&base_url)?;
        settings.base_url = base_url;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .context("failed to build http client")?;
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&settings.session_path));

    match args.command {
        Command::Login { email, password } => {
            auth_client(&http, &settings, session)
                .login(&email, &password)
                .await?;
            println!("Login successful!");
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            auth_client(&http, &settings, session)
                .register(&name, &email, &password)
                .await?;
            println!("Registration successful! You can now log in.");
        }
        Command::Logout => {
            auth_client(&http, &settings, session).logout().await?;
            println!("Logged out.");
        }
        command => {
            let service =
                HttpRecipeService::with_client(http, settings.base_url.clone(), session);
            let controller = RecipeSyncController::new(Arc::new(service));
            run_recipe_command(&controller, command).await?;
        }
    }

    Ok(())
}

fn auth_client(
    http: &reqwest::Client,
    settings: &ClientSettings,
    session: Arc<dyn SessionStore>,
) -> AuthClient {
    AuthClient::with_client(http.clone(), settings.base_url.clone(), session)
}

async fn run_recipe_command(controller: &RecipeSyncController, command: Command) -> Result<()> {
    let mut events = controller.subscribe();

    match command {
        Command::List => {
            controller.refresh().await?;
        }
        Command::Add {
            name,
            ingredients,
            steps,
        } => {
            controller.cancel_edit().await;
            let outcome = controller
                .submit(RecipeDraft::new(name, ingredients, steps))
                .await?;
            if let SubmitOutcome::Created(recipe) = outcome {
                println!("Recipe added successfully! (id {})", recipe.id);
            }
        }
        Command::Edit {
            id,
            name,
            ingredients,
            steps,
        } => {
            controller.refresh().await?;
            let session = controller.begin_edit(&RecipeId::new(id)).await?;
            let mut draft = session.draft;
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(ingredients) = ingredients {
                draft.ingredients = ingredients;
            }
            if let Some(steps) = steps {
                draft.steps = steps;
            }
            controller.submit(draft).await?;
            println!("Recipe updated successfully!");
        }
        Command::Delete { id } => {
            controller.remove(&RecipeId::new(id)).await?;
            println!("Recipe deleted successfully!");
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout => {}
    }

    report_follow_up_failures(&mut events);
    print_recipes(&controller.recipes().await);
    Ok(())
}

fn report_follow_up_failures(events: &mut broadcast::Receiver<ControllerEvent>) {
    loop {
        match events.try_recv() {
            Ok(ControllerEvent::Failed(err)) => eprintln!("Error: {err}"),
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes yet.");
        return;
    }
    for recipe in recipes {
        println!("[{}] {}", recipe.id, recipe.name);
        println!("  Ingredients: {}", recipe.ingredients);
        println!("  Steps: {}", recipe.steps);
    }
}
