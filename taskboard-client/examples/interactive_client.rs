use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use taskboard_client::{EditSession, LoadPhase, RemoteTaskService, TaskStore};
use taskboard_core::{filter::StatusFilter, models::Task};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Interactive task list client", long_about = None)]
struct Cli {
    /// API base URL of the task service
    #[arg(short, long, default_value = "http://localhost:8000/api")]
    server: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = TaskStore::new(RemoteTaskService::new(cli.server));
    store.refresh().await;

    let theme = ColorfulTheme::default();
    loop {
        render(&store).await;

        let actions = [
            "Refresh",
            "Search",
            "Filter",
            "Add task",
            "Edit task",
            "Toggle task",
            "Delete task",
            "Quit",
        ];
        let action = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()
            .unwrap();

        match actions[action] {
            "Refresh" => store.refresh().await,
            "Search" => {
                let text: String = Input::with_theme(&theme)
                    .with_prompt("Search (empty clears)")
                    .allow_empty(true)
                    .interact_text()
                    .unwrap();
                store.set_search(text).await;
            }
            "Filter" => {
                let options = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];
                let picked = Select::with_theme(&theme)
                    .with_prompt("Show")
                    .items(&options)
                    .default(0)
                    .interact()
                    .unwrap();
                store.set_status_filter(options[picked]).await;
            }
            "Add task" => {
                let session = EditSession::add(store.clone());
                run_form(&theme, session).await;
            }
            "Edit task" => {
                if let Some(task) = pick_task(&theme, &store, "Edit which task?").await {
                    let session = EditSession::edit(store.clone(), task);
                    run_form(&theme, session).await;
                }
            }
            "Toggle task" => {
                if let Some(task) = pick_task(&theme, &store, "Toggle which task?").await {
                    store.toggle_complete(&task.id, !task.completed).await;
                }
            }
            "Delete task" => {
                if let Some(task) = pick_task(&theme, &store, "Delete which task?").await {
                    let sure = Confirm::with_theme(&theme)
                        .with_prompt(format!("Delete \"{}\"?", task.title))
                        .interact()
                        .unwrap();
                    if sure {
                        store.remove(&task.id).await;
                    }
                }
            }
            _ => break,
        }
    }
}

async fn render(store: &TaskStore) {
    let snapshot = store.snapshot().await;

    println!();
    println!("{}", "My Tasks".bold());

    let notification = store.notifier().current();
    if notification.visible {
        match notification.severity {
            taskboard_client::Severity::Success => {
                println!("{}", notification.message.green())
            }
            taskboard_client::Severity::Error => println!("{}", notification.message.red()),
        }
    }

    match snapshot.phase {
        LoadPhase::Loading => println!("{}", "Loading…".dimmed()),
        LoadPhase::Failed => {
            if let Some(error) = &snapshot.error {
                println!("{}", error.red());
            }
        }
        _ => {}
    }

    if let Some(empty) = snapshot.empty_state() {
        println!("{}", empty.message().dimmed());
        return;
    }

    for task in &snapshot.tasks {
        let marker = if task.completed { "[x]" } else { "[ ]" };
        let title = if task.completed {
            task.title.strikethrough().to_string()
        } else {
            task.title.clone()
        };
        let description = task.description_or_default();
        if description.is_empty() {
            println!("  {} {} {}", marker, format!("#{}", task.id).dimmed(), title);
        } else {
            println!(
                "  {} {} {} — {}",
                marker,
                format!("#{}", task.id).dimmed(),
                title,
                description.dimmed()
            );
        }
    }
}

async fn pick_task(theme: &ColorfulTheme, store: &TaskStore, prompt: &str) -> Option<Task> {
    let tasks = store.snapshot().await.tasks;
    if tasks.is_empty() {
        println!("{}", "Nothing to pick from.".dimmed());
        return None;
    }
    let labels: Vec<String> = tasks
        .iter()
        .map(|t| format!("#{} {}", t.id, t.title))
        .collect();
    let picked = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .unwrap();
    Some(tasks[picked].clone())
}

async fn run_form(theme: &ColorfulTheme, mut session: EditSession) {
    while session.is_open() {
        let title: String = Input::with_theme(theme)
            .with_prompt("Title")
            .with_initial_text(session.title())
            .allow_empty(true)
            .interact_text()
            .unwrap();
        let description: String = Input::with_theme(theme)
            .with_prompt("Description")
            .with_initial_text(session.description())
            .allow_empty(true)
            .interact_text()
            .unwrap();

        session.set_title(title);
        session.set_description(description);
        session.submit().await;

        if let Some(error) = session.error().map(str::to_string) {
            println!("{}", error.red());
            let retry = Confirm::with_theme(theme)
                .with_prompt("Try again?")
                .interact()
                .unwrap();
            if !retry {
                session.cancel();
            }
        }
    }
}
