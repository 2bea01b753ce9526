use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use roombook_client::{
    api::BookingApi, config::ClientConfig, controller::BookingController,
    notification::Notification,
};
use roombook_core::{
    format::{format_date, format_time},
    models::booking::{Booking, BookingDraft, BookingId},
    slots::SlotOptions,
    time::{parse_draft_time, Clock},
};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(about = "Book the shared meeting room", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the room's details
    Room,

    /// List the bookings of a day
    List {
        /// Day to show (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List today's schedule
    Today,

    /// Show bookable start times, or end times for a given start
    Slots {
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Show end times for this start (HH:MM)
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Book the room
    Book {
        #[arg(short, long)]
        title: String,

        /// Start time (HH:MM), defaults to the next free slot
        #[arg(short, long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: String,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        attendees: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Cancel a booking by its identifier
    Cancel {
        id: BookingId,

        /// Day the booking is on; checked before cancelling
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let mut controller = roombook_client::connect(&config)?;

    let outcome = run(&mut controller, cli.command).await;
    finish(outcome, controller.notification())
}

/// Failures the controller already reported carry its notification text.
fn finish(outcome: Result<()>, notification: Option<&Notification>) -> Result<()> {
    match (outcome, notification) {
        (Ok(()), Some(notification)) => {
            println!("{}", notification.message);
            Ok(())
        }
        (Err(_), Some(notification)) => Err(eyre!("{}", notification.message)),
        (outcome, None) => outcome,
    }
}

async fn run<A: BookingApi, C: Clock>(
    controller: &mut BookingController<A, C>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Room => {
            let room = controller.room();
            let window = controller.window();
            println!("{}", room.name);
            println!("Location: {}", room.location);
            println!("Capacity: {} people", room.capacity);
            println!("Amenities: {}", room.amenities.join(", "));
            println!(
                "Hours: {} - {}",
                format_time(window.open()),
                format_time(window.close())
            );
        }
        Command::List { date } => {
            let date = date.unwrap_or_else(|| controller.selected_date());
            controller.select_date(date).await?;
            print_schedule(date, &controller.bookings_for_selected_date());
        }
        Command::Today => {
            let today = controller.selected_date();
            controller.select_date(today).await?;
            print_schedule(today, &controller.todays_bookings());
        }
        Command::Slots { date, start } => {
            let date = date.unwrap_or_else(|| controller.selected_date());
            controller.select_date(date).await?;

            let options = match start {
                Some(start) => controller.end_options(parse_draft_time(&start)?),
                None => controller.start_options(),
            };
            match options {
                SlotOptions::Available(slots) => {
                    for slot in slots {
                        println!("{}", format_time(slot));
                    }
                }
                SlotOptions::NoneAvailable => println!("No available time slots"),
            }
        }
        Command::Book {
            title,
            start,
            end,
            date,
            attendees,
            notes,
        } => {
            let date = date.unwrap_or_else(|| controller.selected_date());
            controller.select_date(date).await?;

            let mut draft: BookingDraft = controller.new_draft();
            if let Some(start) = start {
                draft.start_time = start;
            }
            draft.title = title;
            draft.end_time = end;
            draft.attendees = attendees.unwrap_or_default();
            draft.notes = notes.unwrap_or_default();

            let booking = controller.submit(&draft).await?;
            println!("Booking #{}", booking.id);
            print_booking(&booking);
        }
        Command::Cancel { id, date } => {
            if let Some(date) = date {
                controller.select_date(date).await?;
            }
            let known = controller
                .bookings_for_selected_date()
                .iter()
                .any(|booking| booking.id == id);
            if date.is_some() && !known {
                return Err(eyre!("No booking #{} on {}", id, controller.selected_date()));
            }
            controller.cancel(id).await?;
            if date.is_some() {
                print_schedule(controller.selected_date(), &controller.bookings_for_selected_date());
            }
        }
    }

    Ok(())
}

fn print_schedule(date: NaiveDate, bookings: &[&Booking]) {
    println!("{}", format_date(date));
    if bookings.is_empty() {
        println!("No bookings for this date");
        return;
    }
    for booking in bookings {
        print_booking(booking);
    }
}

fn print_booking(booking: &Booking) {
    println!(
        "  #{} {} - {}  {}",
        booking.id,
        format_time(booking.start_time),
        format_time(booking.end_time),
        booking.title
    );
    if let Some(attendees) = booking.attendees {
        println!("      {} attendees", attendees);
    }
    if let Some(notes) = booking.notes.as_deref().filter(|notes| !notes.is_empty()) {
        println!("      Notes: {}", notes);
    }
}
