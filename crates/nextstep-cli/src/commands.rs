//! CLI commands

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Subcommand, ValueEnum};
use nextstep_client::calendar;
use nextstep_client::client::admin::ACTIVITY_LOG_PAGE_SIZE;
use nextstep_client::types::{RegisterRequest, UpdateProfileRequest};
use nextstep_client::{FileStore, Locale, NextStepClient};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::render::{self, print_json};

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account; a verification email follows
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "NEXTSTEP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "NEXTSTEP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Confirm an email address with the token from the verification email
    VerifyEmail { token: String },

    /// Send the verification email again
    ResendVerification { email: String },

    /// Request a password reset email
    ForgotPassword { email: String },

    /// Set a new password with the token from the reset email
    ResetPassword {
        token: String,
        #[arg(long, env = "NEXTSTEP_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },

    /// Google sign-in
    Oauth {
        #[command(subcommand)]
        command: OAuthCommands,
    },

    /// Browse available slots and events
    Calendar {
        #[command(subcommand)]
        command: CalendarCommands,
    },

    /// Book a slot or an event
    Reserve {
        #[command(subcommand)]
        command: ReserveCommands,
    },

    /// Cancel a booking
    Cancel {
        #[command(subcommand)]
        command: CancelCommands,
    },

    /// Queue for a full slot
    Waitlist {
        #[command(subcommand)]
        command: WaitlistCommands,
    },

    /// List your bookings
    Reservations {
        #[arg(value_enum, default_value = "all")]
        scope: ReservationScope,
    },

    /// Profile and account settings
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Administration (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum OAuthCommands {
    /// Print the URL that starts Google sign-in
    Url {
        /// Path to return to once sign-in completes
        #[arg(long)]
        return_to: Option<String>,
    },

    /// Finish sign-in from the URL the browser was redirected to
    Callback { url: String },
}

#[derive(Subcommand)]
pub enum CalendarCommands {
    /// Month overview (defaults to the current month)
    Month {
        /// Month as YYYY-MM
        year_month: Option<String>,
    },

    /// Week containing the given date (defaults to today)
    Week { date: Option<NaiveDate> },

    /// Slots and events on one day (defaults to today)
    Day { date: Option<NaiveDate> },

    /// Details of a single slot
    Slot { slot_id: Uuid },

    /// Details of a single event
    Event { event_id: Uuid },
}

#[derive(Subcommand)]
pub enum ReserveCommands {
    Slot {
        slot_id: Uuid,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        participants: Option<u32>,
    },
    Event {
        event_id: Uuid,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        participants: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum CancelCommands {
    Slot { reservation_id: Uuid },
    Event { event_id: Uuid },
}

#[derive(Subcommand)]
pub enum WaitlistCommands {
    Join { slot_id: Uuid },
    Leave { entry_id: Uuid },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReservationScope {
    All,
    Upcoming,
    Past,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Update phone number or nickname
    Profile {
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
    },

    /// Turn email notifications on or off
    Notifications {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },

    /// Switch the interface language and store it on the account
    Language { locale: Locale },

    Password {
        #[arg(long, env = "NEXTSTEP_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "NEXTSTEP_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },

    /// Delete the account permanently
    Delete {
        #[arg(long, env = "NEXTSTEP_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    Users,
    MakeAdmin { user_id: Uuid },
    RemoveAdmin { user_id: Uuid },
    DeleteUser { user_id: Uuid },

    /// Create a slot from a JSON file
    CreateSlot { file: PathBuf },
    /// Update a slot from a JSON file
    UpdateSlot { slot_id: Uuid, file: PathBuf },
    BlockSlot {
        slot_id: Uuid,
        #[arg(long)]
        reason: Option<String>,
    },
    UnblockSlot { slot_id: Uuid },
    DeleteSlot { slot_id: Uuid },
    SlotParticipants { slot_id: Uuid },

    Events,
    Event { event_id: Uuid },
    /// Create an event from a JSON file
    CreateEvent { file: PathBuf },
    /// Update an event from a JSON file
    UpdateEvent { event_id: Uuid, file: PathBuf },
    DeleteEvent { event_id: Uuid },
    EventParticipants { event_id: Uuid },

    /// Upcoming reservations, or past ones, or those on one date
    Reservations {
        #[arg(long, conflicts_with = "past")]
        date: Option<NaiveDate>,
        #[arg(long)]
        past: bool,
    },

    /// Activity log, newest first
    Logs {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = ACTIVITY_LOG_PAGE_SIZE)]
        size: u32,
    },
}

/// Client with file-backed session storage under the state directory
pub fn build_client(settings: &Settings) -> Result<NextStepClient> {
    let tokens = FileStore::open(settings.tokens_file())?;
    let redirects = FileStore::open(settings.redirect_file())?;

    let mut builder = NextStepClient::builder()
        .base_url(&settings.base_url)
        .locale(settings.locale())
        .token_storage(Arc::new(tokens))
        .session_storage(Arc::new(redirects))
        .on_session_expired(|| warn!("Session expired, sign in again with `nextstep login`"));

    if settings.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
    }

    Ok(builder.build()?)
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Commands {
    pub async fn execute(self, client: &NextStepClient, json: bool) -> Result<()> {
        match self {
            Commands::Register {
                email,
                first_name,
                last_name,
                phone,
                password,
            } => {
                let request = RegisterRequest {
                    email,
                    password,
                    first_name,
                    last_name,
                    phone,
                };
                let response = client.register(&request).await?;
                println!("{}", response.message);
                Ok(())
            }
            Commands::Login { email, password } => {
                let user = client.login(&email, &password).await?;
                println!("Signed in as {} <{}>", user.full_name(), user.email);
                Ok(())
            }
            Commands::Logout => {
                client.logout()?;
                println!("Signed out");
                Ok(())
            }
            Commands::Whoami => {
                match client.restore_session().await? {
                    Some(user) if json => print_json(&user)?,
                    Some(user) => println!("{} <{}> ({:?})", user.full_name(), user.email, user.role),
                    None => println!("Not signed in"),
                }
                Ok(())
            }
            Commands::VerifyEmail { token } => {
                println!("{}", client.verify_email(&token).await?.message);
                Ok(())
            }
            Commands::ResendVerification { email } => {
                println!("{}", client.resend_verification(&email).await?.message);
                Ok(())
            }
            Commands::ForgotPassword { email } => {
                println!("{}", client.forgot_password(&email).await?.message);
                Ok(())
            }
            Commands::ResetPassword {
                token,
                new_password,
            } => {
                println!("{}", client.reset_password(&token, &new_password).await?.message);
                Ok(())
            }
            Commands::Oauth { command } => command.execute(client).await,
            Commands::Calendar { command } => command.execute(client, json).await,
            Commands::Reserve { command } => command.execute(client).await,
            Commands::Cancel { command } => command.execute(client).await,
            Commands::Waitlist { command } => command.execute(client).await,
            Commands::Reservations { scope } => {
                match scope {
                    ReservationScope::All => print_json(&client.my_reservations().await?)?,
                    ReservationScope::Upcoming => {
                        print_json(&client.my_upcoming_reservations().await?)?;
                    }
                    ReservationScope::Past => print_json(&client.my_past_reservations().await?)?,
                }
                Ok(())
            }
            Commands::Account { command } => command.execute(client).await,
            Commands::Admin { command } => command.execute(client).await,
        }
    }
}

impl OAuthCommands {
    pub async fn execute(self, client: &NextStepClient) -> Result<()> {
        match self {
            OAuthCommands::Url { return_to } => {
                if let Some(path) = return_to {
                    client.redirects().save(&path)?;
                }
                println!("{}", client.oauth_authorization_url());
                Ok(())
            }
            OAuthCommands::Callback { url } => {
                let (user, redirect) = client.complete_oauth(&url).await?;
                println!("Signed in as {} <{}>", user.full_name(), user.email);
                if let Some(path) = redirect {
                    println!("Continue at {path}");
                }
                Ok(())
            }
        }
    }
}

impl CalendarCommands {
    pub async fn execute(self, client: &NextStepClient, json: bool) -> Result<()> {
        match self {
            CalendarCommands::Month { year_month } => {
                let year_month =
                    year_month.unwrap_or_else(|| today().format("%Y-%m").to_string());
                let view = client.month_view(&year_month).await?;
                if json {
                    print_json(&view)?;
                } else {
                    print!("{}", render::month(&view)?);
                }
            }
            CalendarCommands::Week { date } => {
                let monday = calendar::week_start(date.unwrap_or_else(today));
                print_json(&client.week_view(monday).await?)?;
            }
            CalendarCommands::Day { date } => {
                let view = client.day_view(date.unwrap_or_else(today)).await?;
                if json {
                    print_json(&view)?;
                } else {
                    print!("{}", render::day(&view)?);
                }
            }
            CalendarCommands::Slot { slot_id } => {
                print_json(&client.slot_details(slot_id).await?)?;
            }
            CalendarCommands::Event { event_id } => {
                let event = client.event_summary(event_id).await?;
                if json {
                    print_json(&event)?;
                } else {
                    println!("{}", render::event_line(&event));
                }
            }
        }
        Ok(())
    }
}

impl ReserveCommands {
    pub async fn execute(self, client: &NextStepClient) -> Result<()> {
        match self {
            ReserveCommands::Slot {
                slot_id,
                comment,
                participants,
            } => {
                let result = client.reserve_slot(slot_id, comment, participants).await?;
                info!(reservation_id = %result.reservation_id, "Slot reserved");
                println!("{}", result.message);
            }
            ReserveCommands::Event {
                event_id,
                comment,
                participants,
            } => {
                let result = client.reserve_event(event_id, comment, participants).await?;
                info!(%event_id, slots = result.slots_reserved, "Event reserved");
                println!("{}", result.message);
            }
        }
        Ok(())
    }
}

impl CancelCommands {
    pub async fn execute(self, client: &NextStepClient) -> Result<()> {
        match self {
            CancelCommands::Slot { reservation_id } => {
                client.cancel_reservation(reservation_id).await?;
            }
            CancelCommands::Event { event_id } => {
                client.cancel_event_reservation(event_id).await?;
            }
        }
        println!("Reservation cancelled");
        Ok(())
    }
}

impl WaitlistCommands {
    pub async fn execute(self, client: &NextStepClient) -> Result<()> {
        match self {
            WaitlistCommands::Join { slot_id } => {
                let result = client.join_waitlist(slot_id).await?;
                println!("{} (position {}, entry {})", result.message, result.position, result.entry_id);
            }
            WaitlistCommands::Leave { entry_id } => {
                client.leave_waitlist(entry_id).await?;
                println!("Left the waitlist");
            }
        }
        Ok(())
    }
}

impl AccountCommands {
    pub async fn execute(self, client: &NextStepClient) -> Result<()> {
        match self {
            AccountCommands::Profile { phone, nickname } => {
                let user = client
                    .update_profile(&UpdateProfileRequest { phone, nickname })
                    .await?;
                print_json(&user)?;
            }
            AccountCommands::Notifications { enabled } => {
                client.update_notifications(enabled).await?;
                println!("Email notifications {}", if enabled { "on" } else { "off" });
            }
            AccountCommands::Language { locale } => {
                client.update_language(locale).await?;
                client.set_locale(locale);
                println!("Language set to {locale}");
            }
            AccountCommands::Password { current, new } => {
                client.change_password(&current, &new).await?;
                println!("Password changed");
            }
            AccountCommands::Delete { password } => {
                client.delete_account(&password).await?;
                println!("Account deleted");
            }
        }
        Ok(())
    }
}

impl AdminCommands {
    pub async fn execute(self, client: &NextStepClient) -> Result<()> {
        match self {
            AdminCommands::Users => print_json(&client.all_users().await?)?,
            AdminCommands::MakeAdmin { user_id } => {
                client.make_admin(user_id).await?;
                println!("{user_id} is now an admin");
            }
            AdminCommands::RemoveAdmin { user_id } => {
                client.remove_admin(user_id).await?;
                println!("{user_id} is no longer an admin");
            }
            AdminCommands::DeleteUser { user_id } => {
                client.delete_user(user_id).await?;
                println!("Deleted user {user_id}");
            }
            AdminCommands::CreateSlot { file } => {
                let request = read_json_file(&file)?;
                print_json(&client.create_slot(&request).await?)?;
            }
            AdminCommands::UpdateSlot { slot_id, file } => {
                let request = read_json_file(&file)?;
                print_json(&client.update_slot(slot_id, &request).await?)?;
            }
            AdminCommands::BlockSlot { slot_id, reason } => {
                client.block_slot(slot_id, reason.as_deref()).await?;
                println!("Blocked slot {slot_id}");
            }
            AdminCommands::UnblockSlot { slot_id } => {
                client.unblock_slot(slot_id).await?;
                println!("Unblocked slot {slot_id}");
            }
            AdminCommands::DeleteSlot { slot_id } => {
                client.delete_slot(slot_id).await?;
                println!("Deleted slot {slot_id}");
            }
            AdminCommands::SlotParticipants { slot_id } => {
                print_json(&client.slot_participants(slot_id).await?)?;
            }
            AdminCommands::Events => print_json(&client.all_events().await?)?,
            AdminCommands::Event { event_id } => {
                print_json(&client.event_details(event_id).await?)?;
            }
            AdminCommands::CreateEvent { file } => {
                let request = read_json_file(&file)?;
                print_json(&client.create_event(&request).await?)?;
            }
            AdminCommands::UpdateEvent { event_id, file } => {
                let request = read_json_file(&file)?;
                print_json(&client.update_event(event_id, &request).await?)?;
            }
            AdminCommands::DeleteEvent { event_id } => {
                client.delete_event(event_id).await?;
                println!("Deleted event {event_id}");
            }
            AdminCommands::EventParticipants { event_id } => {
                print_json(&client.event_participants(event_id).await?)?;
            }
            AdminCommands::Reservations { date, past } => {
                let reservations = match (date, past) {
                    (Some(date), _) => client.reservations_on(date).await?,
                    (None, true) => client.past_reservations().await?,
                    (None, false) => client.upcoming_reservations().await?,
                };
                print_json(&reservations)?;
            }
            AdminCommands::Logs { page, size } => {
                print_json(&client.activity_logs(page, size).await?)?;
            }
        }
        Ok(())
    }
}
