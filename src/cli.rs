//! `courtside` subcommands. Each one maps to a page or action of the club
//! site and goes through the same session, API and schedule layers.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use crate::announcements::{Announcement, AnnouncementBoard, AnnouncementError};
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{
    AvailabilityRequest, CourtBooking, LessonRequest, MessageResponse, NewUser, Reservation,
    ReservationRequest, Role, UserRecord, UserUpdate,
};
use crate::navigation::public_routes;
use crate::reservation::{Banner, FormStatus, ReservationForm, ReservationSlot, COURTS};
use crate::schedule::{
    default_programme, detect_conflicts, filter_by_group, grid, unique_groups, validate_for_save,
    Day, GroupCode, LocalScheduleStore, ScheduleEditor, ScheduleEntry, ScheduleError, TimeSlot,
};
use crate::storage::StorageError;
use crate::types::SharedStorage;
use crate::views::{profile_view, require_session, Redirect};

#[derive(Parser, Debug)]
#[command(name = "courtside", version, about = "Tennis club member client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and cache the session
    Login {
        user_id: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in member
    Profile {
        /// Re-read the record from the server first
        #[arg(long)]
        refresh: bool,
    },
    /// List the pages available to the current session
    Nav {
        #[arg(long)]
        current: Option<String>,
    },
    /// Create a member account (admin only)
    Register {
        first_name: String,
        last_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: Role,
    },
    /// Book a court
    Reserve {
        #[arg(long, default_value = "1")]
        court: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Slot label or its start time, e.g. 09:30
        #[arg(long, value_parser = parse_slot)]
        slot: Option<ReservationSlot>,
    },
    /// List reservations; yours only unless --all
    Reservations {
        #[arg(long)]
        all: bool,
    },
    Cancel { reservation_id: String },
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Coach directory with availability
    Coaches,
    #[command(subcommand)]
    Availability(AvailabilityCommand),
    #[command(subcommand)]
    Teams(TeamsCommand),
    #[command(subcommand)]
    Lessons(LessonsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
    #[command(subcommand)]
    Announcements(AnnouncementsCommand),
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Print the weekly grid and its legend
    Show {
        #[arg(long)]
        group: Option<GroupCode>,
    },
    Add(EntryArgs),
    /// Remove the entry at a position as listed by `schedule show`
    Remove { index: usize },
    /// Report court conflicts and double bookings
    Check,
    /// Load the club's default programme into an empty schedule
    Seed {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct EntryArgs {
    pub day: Day,
    pub time: TimeSlot,
    pub court: String,
    pub group: GroupCode,
}

#[derive(Subcommand, Debug)]
pub enum AvailabilityCommand {
    Add {
        #[arg(long)]
        coach_id: String,
        #[arg(long)]
        day: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Show { coach_id: String },
}

#[derive(Subcommand, Debug)]
pub enum TeamsCommand {
    List,
    Show { team_id: String },
    Create { name: String, coach_id: String },
    Assign { team_id: String, player_id: String },
    Members { team_id: String },
    RemovePlayer { team_id: String, player_id: String },
}

#[derive(Subcommand, Debug)]
pub enum LessonsCommand {
    Book {
        #[arg(long)]
        coach_id: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Player { user_id: String },
    Coach { coach_id: String },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    Players,
    Update {
        user_id: i64,
        #[arg(long)]
        new_id: Option<i64>,
        #[arg(long)]
        new_password: Option<String>,
    },
    Delete { user_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AnnouncementsCommand {
    /// Club notices, newest first
    List,
    /// Post a notice (coaches and admins)
    Create {
        title: String,
        content: String,
        #[arg(long)]
        important: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Replace the local schedule with the server's
    SchedulePull,
    /// Validate the local schedule and upload it
    SchedulePush,
    Bookings,
    /// Book a court on behalf of a client
    Book {
        #[arg(long)]
        court: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_slot)]
        slot: ReservationSlot,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{source}; sign in again at {}", .redirect.location())]
    SignedOut {
        redirect: Redirect,
        #[source]
        source: ApiError,
    },
    #[error("Please sign in first ({})", .0.location())]
    Redirect(Redirect),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Announcement(#[from] AnnouncementError),
    #[error("{0}")]
    Rejected(String),
}

impl From<Redirect> for CliError {
    fn from(redirect: Redirect) -> Self {
        CliError::Redirect(redirect)
    }
}

fn parse_slot(value: &str) -> Result<ReservationSlot, String> {
    ReservationSlot::parse(value).ok_or_else(|| {
        let known: Vec<&str> = ReservationSlot::all().map(|s| s.start()).collect();
        format!("unknown slot {value:?}, expected one of {}", known.join(", "))
    })
}

/// Turns a rejected token into a pointer back to the login page.
fn guarded<T>(result: ApiResult<T>, return_to: &str) -> Result<T, CliError> {
    result.map_err(|source| match Redirect::from_api_error(&source, return_to) {
        Some(redirect) => {
            warn!("cli:: {return_to} rejected the session: {source}");
            CliError::SignedOut { redirect, source }
        }
        None => CliError::Api(source),
    })
}

fn print_ack(response: &MessageResponse, default: &str) {
    println!("{}", response.message.as_deref().unwrap_or(default));
}

fn print_users(users: &[UserRecord]) {
    for user in users {
        let role = user.role.map(|r| r.label()).unwrap_or("-");
        println!("{:>6}  {:<28} {}", user.id.to_string(), user.full_name(), role);
    }
}

fn print_reservations(reservations: &[Reservation]) {
    if reservations.is_empty() {
        println!("No reservations.");
    }
    for r in reservations {
        let id = r.id.as_ref().map(ToString::to_string).unwrap_or_default();
        let phone = r.client_phone.as_deref().unwrap_or("");
        println!("{:>6}  court {:<3} {}  {}", id, r.court_id.to_string(), r.reservation_time, phone);
    }
}

pub fn print_schedule(entries: &[ScheduleEntry], group: Option<GroupCode>) {
    let visible = filter_by_group(entries, group);
    if visible.is_empty() {
        println!("No classes scheduled.");
        return;
    }

    let mut current_day = None;
    for ((day, time), cell) in grid(visible) {
        if current_day != Some(day) {
            println!("{day}");
            current_day = Some(day);
        }
        for entry in cell {
            println!("  {:<10} {:<8} {}", time.label(), entry.court, entry.group);
        }
    }

    println!();
    for code in unique_groups(entries) {
        println!("  {:<6} {}", code.label(), code.style().color);
    }
}

fn print_entries(entries: &[ScheduleEntry]) {
    for (i, e) in entries.iter().enumerate() {
        println!("{:>3}  {:<9} {:<10} {:<8} {}", i, e.day, e.time, e.court, e.group);
    }
}

pub async fn run(cli: Cli, client: &ApiClient, storage: SharedStorage) -> Result<(), CliError> {
    let local = LocalScheduleStore::new(storage.clone());
    match cli.command {
        Command::Login { user_id, password } => {
            let session = client.login(&user_id, &password).await?;
            println!("Welcome back, {}!", session.user.full_name());
            println!("Dashboard: {}", session.user.role.dashboard());
        }
        Command::Logout => {
            client.logout()?;
            println!("Signed out.");
        }
        Command::Profile { refresh } => {
            if refresh {
                guarded(client.refresh_profile().await, "/profile")?;
            }
            let view = profile_view(client.session())?;
            println!("{} ({})", view.full_name, view.initials);
            println!("Role:  {}", view.role);
            if let Some(phone) = &view.phone_number {
                println!("Phone: {phone}");
            }
        }
        Command::Nav { current } => {
            let current = current.unwrap_or_default();
            let routes = match client.session().get_session() {
                Some(session) => session.user.role.menu(),
                None => public_routes(),
            };
            for route in routes {
                let marker = if route.is_active(&current) { "*" } else { " " };
                println!("{marker} {:<16} {}", route.label, route.path);
            }
        }
        Command::Register {
            first_name,
            last_name,
            password,
            role,
        } => {
            let user = NewUser {
                first_name,
                last_name,
                password,
                role,
            };
            let response = guarded(client.register_user(&user).await, "/admin/register")?;
            print_ack(&response, "User registered.");
        }
        Command::Reserve { court, date, slot } => {
            let mut form = ReservationForm::new();
            form.court_id = court;
            form.date = date;
            form.slot = slot;
            form.submit(client).await;

            if let FormStatus::Confirmed(receipt) = form.status() {
                if let Some(id) = &receipt.reservation_id {
                    info!("cli:: reservation id {id}");
                }
            }
            match form.banner() {
                Some(Banner::Success(message)) => println!("{message}"),
                Some(Banner::Error(message)) => return Err(CliError::Rejected(message)),
                None => {}
            }
        }
        Command::Reservations { all } => {
            let reservations = if all {
                guarded(client.all_reservations().await, "/reservation")?
            } else {
                guarded(client.my_reservations().await, "/reservation")?
            };
            print_reservations(&reservations);
        }
        Command::Cancel { reservation_id } => {
            let response = guarded(client.delete_reservation(&reservation_id).await, "/reservation")?;
            print_ack(&response, "Reservation cancelled.");
        }
        Command::Schedule(command) => run_schedule(command, client, local).await?,
        Command::Coaches => {
            for listing in client.coach_directory().await? {
                println!("{}", listing.coach.full_name());
                if listing.availability.is_empty() {
                    println!("    no availability posted");
                }
                for slot in &listing.availability {
                    println!("    {:<10} {} - {}", slot.day, slot.start_time, slot.end_time);
                }
            }
        }
        Command::Availability(command) => match command {
            AvailabilityCommand::Add {
                coach_id,
                day,
                start,
                end,
            } => {
                let request = AvailabilityRequest {
                    coach_id,
                    day,
                    start_time: start,
                    end_time: end,
                };
                let response = guarded(client.add_availability(&request).await, "/coach/availability")?;
                print_ack(&response, "Availability added.");
            }
            AvailabilityCommand::Show { coach_id } => {
                for slot in client.availability(&coach_id).await? {
                    println!("{:<10} {} - {}", slot.day, slot.start_time, slot.end_time);
                }
            }
        },
        Command::Teams(command) => run_teams(command, client).await?,
        Command::Lessons(command) => match command {
            LessonsCommand::Book {
                coach_id,
                date,
                start,
                end,
            } => {
                let request = LessonRequest {
                    coach_id,
                    lesson_date: date.format("%Y-%m-%d").to_string(),
                    start_time: start,
                    end_time: end,
                };
                let response = guarded(client.book_lesson(&request).await, "/player/lessons")?;
                print_ack(&response, "Lesson booked.");
            }
            LessonsCommand::Player { user_id } => {
                let lessons = guarded(client.player_lessons(&user_id).await, "/player/lessons")?;
                for l in lessons {
                    let coach = l.coach_name.unwrap_or_default();
                    println!("{}  {}-{}  {}", l.lesson_date, l.start_time, l.end_time, coach);
                }
            }
            LessonsCommand::Coach { coach_id } => {
                let lessons = guarded(client.coach_lessons(&coach_id).await, "/coach/lessons")?;
                for l in lessons {
                    let player = l.player_name.unwrap_or_default();
                    println!("{}  {}-{}  {}", l.lesson_date, l.start_time, l.end_time, player);
                }
            }
        },
        Command::Users(command) => match command {
            UsersCommand::Players => print_users(&client.players().await?),
            UsersCommand::Update {
                user_id,
                new_id,
                new_password,
            } => {
                let update = UserUpdate { new_id, new_password };
                let response = guarded(client.update_user(user_id, &update).await, "/admin/users")?;
                print_ack(&response, "User updated.");
            }
            UsersCommand::Delete { user_id } => {
                let response = guarded(client.delete_user(user_id).await, "/admin/users")?;
                print_ack(&response, "User deleted.");
            }
        },
        Command::Admin(command) => run_admin(command, client, local).await?,
        Command::Announcements(command) => {
            let board = AnnouncementBoard::new(storage, client.session().clone());
            run_announcements(command, &board)?
        }
    }
    Ok(())
}

fn run_announcements(command: AnnouncementsCommand, board: &AnnouncementBoard) -> Result<(), CliError> {
    match command {
        AnnouncementsCommand::List => print_announcements(&board.list()),
        AnnouncementsCommand::Create {
            title,
            content,
            important,
        } => {
            board.create(&title, &content, important)?;
            println!("Announcement created successfully");
        }
        AnnouncementsCommand::Delete { id } => {
            if !board.delete(&id)? {
                return Err(CliError::Rejected("Failed to delete announcement".to_string()));
            }
            println!("Announcement deleted successfully");
        }
    }
    Ok(())
}

fn print_announcements(announcements: &[Announcement]) {
    if announcements.is_empty() {
        println!("No announcements.");
    }
    for a in announcements {
        let flag = if a.important { "!" } else { " " };
        println!("{flag} {}  {}", a.created_at.format("%Y-%m-%d"), a.title);
        println!("    {} ({}), id {}", a.author_name, a.author_role, a.id);
        println!("    {}", a.content);
    }
}

async fn run_schedule(
    command: ScheduleCommand,
    client: &ApiClient,
    local: LocalScheduleStore,
) -> Result<(), CliError> {
    let editor = ScheduleEditor::new(local, client.session().clone());
    match command {
        ScheduleCommand::Show { group } => print_schedule(&editor.load().await, group),
        ScheduleCommand::Add(args) => {
            require_session(client.session(), "/admin/schedule")?;
            let entry = ScheduleEntry::new(args.day, args.time, args.court, args.group);
            let entries = editor.add(entry).await?;
            print_entries(&entries);
        }
        ScheduleCommand::Remove { index } => {
            require_session(client.session(), "/admin/schedule")?;
            let entries = editor.remove(index).await?;
            print_entries(&entries);
        }
        ScheduleCommand::Check => {
            let conflicts = detect_conflicts(&editor.load().await);
            if conflicts.is_empty() {
                println!("No conflicts.");
            }
            for conflict in conflicts {
                println!("{conflict}");
            }
        }
        ScheduleCommand::Seed { force } => {
            require_session(client.session(), "/admin/schedule")?;
            let existing = editor.load().await;
            if !existing.is_empty() && !force {
                println!("Schedule already has {} entries; use --force to replace it.", existing.len());
                return Ok(());
            }
            let programme = default_programme();
            editor.replace_all(&programme).await?;
            println!("Loaded {} classes.", programme.len());
        }
    }
    Ok(())
}

async fn run_teams(command: TeamsCommand, client: &ApiClient) -> Result<(), CliError> {
    match command {
        TeamsCommand::List => {
            for team in guarded(client.teams().await, "/teams")? {
                let coach = team.coach_name.unwrap_or_default();
                println!("{:>4}  {:<24} {}", team.id.to_string(), team.team_name, coach);
            }
        }
        TeamsCommand::Show { team_id } => {
            let team = guarded(client.team(&team_id).await, "/teams")?;
            println!("{} ({})", team.team_name, team.coach_name.unwrap_or_default());
            print_users(&team.members);
        }
        TeamsCommand::Create { name, coach_id } => {
            let response = guarded(client.create_team(&name, &coach_id).await, "/admin/teams")?;
            print_ack(&response, "Team created.");
        }
        TeamsCommand::Assign { team_id, player_id } => {
            let response = guarded(client.assign_player(&team_id, &player_id).await, "/admin/teams")?;
            print_ack(&response, "Player assigned.");
        }
        TeamsCommand::Members { team_id } => {
            print_users(&guarded(client.team_members(&team_id).await, "/teams")?);
        }
        TeamsCommand::RemovePlayer { team_id, player_id } => {
            let response = guarded(client.remove_player(&team_id, &player_id).await, "/admin/teams")?;
            print_ack(&response, "Player removed.");
        }
    }
    Ok(())
}

async fn run_admin(command: AdminCommand, client: &ApiClient, local: LocalScheduleStore) -> Result<(), CliError> {
    match command {
        AdminCommand::Login { username, password } => {
            let session = client.admin_login(&username, &password).await?;
            println!("Admin console signed in ({}).", session.role);
        }
        AdminCommand::Logout => {
            client.admin_session().clear()?;
            println!("Admin console signed out.");
        }
        AdminCommand::SchedulePull => {
            let entries = client.fetch_schedule().await?;
            local.replace(&entries)?;
            println!("Pulled {} classes from the server.", entries.len());
        }
        AdminCommand::SchedulePush => {
            let entries = local.load_entries();
            if let Err(e) = validate_for_save(&entries) {
                if let ScheduleError::Conflicts(conflicts) = &e {
                    for conflict in conflicts {
                        println!("{conflict}");
                    }
                }
                return Err(e.into());
            }
            let response = client.save_schedule(&entries).await?;
            print_ack(&response, "Schedule saved.");
        }
        AdminCommand::Bookings => print_reservations(&client.fetch_bookings().await?),
        AdminCommand::Book {
            court,
            date,
            slot,
            phone,
        } => {
            if !COURTS.iter().any(|c| c.id == court) {
                return Err(CliError::Rejected(format!("Unknown court {court}")));
            }
            let request = ReservationRequest::new(&court, date, slot);
            let booking = CourtBooking {
                court_id: request.court_id,
                reservation_time: request.reservation_time,
                client_phone: phone,
            };
            let response = client.manage_booking(&booking).await?;
            print_ack(&response, "Court booked.");
        }
    }
    Ok(())
}
