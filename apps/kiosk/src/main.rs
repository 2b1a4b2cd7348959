use anyhow::{Context, Result};
use assistant::{prompts, Conversation};
use clap::{Args, Parser, Subcommand};
use portal::{translations::PortalText, AuthSession, DemoDirectory, Schedule};
use shared::{domain::Language, protocol::HomeView};
use tokio::io::{AsyncBufReadExt, BufReader};
use wayfinding::WalkConfig;

mod client;
mod walk;

use client::ClinicClient;
use walk::SensorSetup;

#[derive(Parser, Debug)]
#[command(about = "Clinic kiosk: guided walk, assistant chat and sign-in check")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the radiology route from the terminal.
    Walk(WalkArgs),
    /// Ask the clinic assistant through the server.
    Chat(ChatArgs),
    /// Sign in and print the home screen.
    Login(LoginArgs),
}

#[derive(Args, Debug)]
struct WalkArgs {
    /// Run without an orientation sensor.
    #[arg(long, conflicts_with = "deny")]
    no_sensor: bool,
    /// Simulate the user refusing compass access.
    #[arg(long)]
    deny: bool,
    /// Alignment tolerance in degrees.
    #[arg(long, default_value_t = wayfinding::bearing::ALIGNMENT_TOLERANCE_DEGREES)]
    tolerance: f64,
    #[arg(long, default_value = "en")]
    language: Language,
}

#[derive(Args, Debug)]
struct ServerArgs {
    #[arg(long, default_value = "http://127.0.0.1:8443")]
    server_url: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "en")]
    language: Language,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[command(flatten)]
    server: ServerArgs,
    /// Check the credentials against the built-in demo accounts instead of
    /// the server.
    #[arg(long)]
    offline: bool,
}

#[derive(Args, Debug)]
struct ChatArgs {
    #[command(flatten)]
    server: ServerArgs,
    /// Single message to send; omit to chat interactively.
    #[arg(long, conflicts_with = "voice")]
    message: Option<String>,
    /// Send the canned voice-input phrase.
    #[arg(long)]
    voice: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::Walk(args) => run_walk(args).await,
        Command::Chat(args) => run_chat(args).await,
        Command::Login(args) => run_login(args).await,
    }
}

async fn run_walk(args: WalkArgs) -> Result<()> {
    if !args.tolerance.is_finite() || args.tolerance <= 0.0 || args.tolerance > 180.0 {
        anyhow::bail!("tolerance must be within (0, 180] degrees");
    }
    let setup = if args.no_sensor {
        SensorSetup::Absent
    } else if args.deny {
        SensorSetup::Denied
    } else {
        SensorSetup::Granted
    };
    let config = WalkConfig {
        alignment_tolerance_degrees: args.tolerance,
        language: args.language,
        ..WalkConfig::default()
    };
    walk::run(setup, config).await
}

async fn signed_in(args: &ServerArgs) -> Result<ClinicClient> {
    let mut client = ClinicClient::new(&args.server_url);
    let user = client
        .login(&args.username, &args.password, args.language)
        .await
        .context("sign-in failed")?;
    let text = PortalText::for_language(args.language);
    println!("{}", text.greeting(user.first_name()));
    Ok(client)
}

async fn run_login(args: LoginArgs) -> Result<()> {
    if args.offline {
        return run_offline_login(&args.server).await;
    }
    let mut client = signed_in(&args.server).await?;
    let home = client.home().await?;
    print_home(&home, args.server.language);
    client.logout().await
}

async fn run_offline_login(args: &ServerArgs) -> Result<()> {
    let mut session = AuthSession::default();
    let user = session
        .login(&DemoDirectory, &args.username, &args.password)
        .await
        .map_err(|error| anyhow::anyhow!(error.user_message(args.language)))?;
    let text = PortalText::for_language(args.language);
    println!("{}", text.greeting(user.first_name()));
    let home = Schedule::demo().home_view(user);
    print_home(&home, args.language);
    session.logout();
    Ok(())
}

fn print_home(home: &HomeView, language: Language) {
    let text = PortalText::for_language(language);
    match home {
        HomeView::Patient(home) => {
            println!(
                "{} {} ({}) at {}",
                text.appointment_with,
                home.patient.doctor,
                home.patient.department,
                home.patient.appointment_time.format("%H:%M")
            );
            if home.status.delay_minutes > 0 {
                println!("+{} {}", home.status.delay_minutes, text.running_late);
                println!("{} {}", text.free_time(home.free_minutes), text.relax);
            }
            if home.checked_in {
                println!("{}", text.checked_in);
            } else {
                println!("{}", text.confirm_arrival);
            }
        }
        HomeView::Clinician(home) => {
            println!(
                "{}: {} in queue, {} critical, +{} min",
                home.display_name,
                home.queue.stats.in_queue,
                home.queue.stats.critical_cases,
                home.queue.stats.average_lag_minutes
            );
            for entry in &home.queue.entries {
                println!(
                    "  {} {:<18} {:<18} {}",
                    entry.slot.format("%H:%M"),
                    entry.patient_name,
                    entry.reason,
                    portal::translations::queue_status_label(entry.status, language)
                );
            }
        }
    }
}

async fn run_chat(args: ChatArgs) -> Result<()> {
    let mut client = signed_in(&args.server).await?;
    let language = args.server.language;
    let mut conversation = Conversation::new(language);
    println!("IWI: {}", prompts::greeting(language));

    let single = if args.voice {
        Some(prompts::voice_phrase(language).to_string())
    } else {
        args.message
    };

    if let Some(message) = single {
        exchange(&client, &mut conversation, &message).await?;
    } else {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if matches!(line.trim(), "quit" | "exit") {
                break;
            }
            exchange(&client, &mut conversation, &line).await?;
        }
    }
    client.logout().await
}

async fn exchange(client: &ClinicClient, conversation: &mut Conversation, input: &str) -> Result<()> {
    let Some(history) = conversation.push_user(input) else {
        return Ok(());
    };
    println!("> {input}");
    let reply = client.ask(history, input, conversation.language()).await?;
    println!("IWI: {}", conversation.push_reply(reply).text);
    Ok(())
}
