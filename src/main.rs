//! Elidune Desk - circulation desk console
//!
//! Talks to the Elidune library web application over its JSON endpoints.

use anyhow::Context;

use elidune_desk::{
    client::HttpLibraryClient,
    config::AppConfig,
    console::{self, Command, OpenForm},
    desk::{Desk, Event, Handled},
    forms::FormState,
    surface::ConsoleSurface,
};

const PROMPT: &str = "desk> ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let _log_guard = elidune_desk::telemetry::init(&config.logging);

    tracing::info!("Starting Elidune Desk v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpLibraryClient::new(&config.server, &config.client)
        .context("Failed to create HTTP client")?;
    tracing::info!("Using library server at {}", client.base_url());

    let surface = ConsoleSurface::new().context("Failed to open the terminal")?;
    let desk = Desk::new(client, surface);

    println!("Elidune Desk v{} - type 'help' for commands", env!("CARGO_PKG_VERSION"));

    let mut open = OpenForm::None;
    loop {
        let prompt = match open {
            OpenForm::None => PROMPT.to_string(),
            OpenForm::Book => format!("(book) {}", PROMPT),
            OpenForm::Member => format!("(member) {}", PROMPT),
        };

        let Some(line) = desk.surface().read_line(&prompt) else {
            println!("Good bye!");
            break;
        };

        let event = match console::parse_command(&line, open) {
            Ok(Some(Command::Event(event))) => event,
            Ok(Some(Command::Help)) => {
                println!("{}", console::HELP);
                continue;
            }
            Ok(Some(Command::Quit)) => {
                println!("Good bye!");
                break;
            }
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        let opens = match &event {
            Event::EditBookClicked { .. } => OpenForm::Book,
            Event::EditMemberClicked { .. } => OpenForm::Member,
            _ => open,
        };

        let handled = desk.dispatch(event).await;
        tracing::debug!("Handled: {:?}", handled);

        open = if handled == Handled::Reloaded {
            OpenForm::None
        } else if desk.book_state() == FormState::Populated && opens == OpenForm::Book {
            OpenForm::Book
        } else if desk.member_state() == FormState::Populated && opens == OpenForm::Member {
            OpenForm::Member
        } else {
            OpenForm::None
        };
    }

    Ok(())
}
