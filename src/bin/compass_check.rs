use std::path::PathBuf;
use std::sync::Arc;

use compass::aggregate::completion_rate;
use compass::config::CompassConfig;
use compass::pages::{DashboardPage, JournalPage, PlanningPage, TasksPage, VideosPage, VisionPage};
use compass::services::AuthSession;
use compass::store::{EntityStore, keys};

fn main() {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(CompassConfig::default_path);
    let config = CompassConfig::load(&config_path);

    if let Err(e) = compass::logging::init("compass-check", config.debug_logging) {
        eprintln!("Journal logging unavailable: {}", e);
    }

    println!("=== Compass store check ===\n");
    println!("Config: {}", config_path.display());
    println!("Data:   {}", config.data_directory.display());
    println!("Sync delay: {:?}\n", config.sync_delay());

    if let Err(e) = config.ensure_dirs() {
        eprintln!("Cannot create {}: {}", config.data_directory.display(), e);
        std::process::exit(1);
    }

    let store = Arc::new(EntityStore::from_config(&config));
    let today = chrono::Local::now().date_naive();

    // Report unreadable keys; pages would silently fall back to defaults.
    for key in keys::ALL {
        if let Err(e) = store.try_load::<serde_json::Value>(key) {
            println!("  ! {}: {}", key, e);
        }
    }

    let tasks = TasksPage::mount(Arc::clone(&store), &config);
    let all = tasks.tasks().as_slice();
    println!(
        "Tasks: {} ({} completed, {}%)",
        all.len(),
        all.iter().filter(|t| t.completed).count(),
        completion_rate(all, |t| t.completed)
    );
    println!(
        "  overdue: {}, recurring: {}",
        all.iter().filter(|t| t.is_overdue(today)).count(),
        all.iter().filter(|t| t.recurring).count()
    );
    println!("Projects: {}", tasks.projects().join(", "));

    let journal = JournalPage::mount(Arc::clone(&store));
    let tags: Vec<String> = journal.all_tags().into_iter().collect();
    println!("\nJournal: {} entries, tags: [{}]", journal.entries().len(), tags.join(", "));

    let planning = PlanningPage::mount(Arc::clone(&store), today);
    println!("\nPlanning:");
    for year in planning.available_years() {
        let goals = planning.planner(year).map_or(0, |p| p.goals.len());
        println!("  {}: {} goals, {}%", year, goals, planning.year_progress(year));
    }
    println!("  months planned: {}/12", planning.monthly_plans().planned_months());

    let vision = VisionPage::mount(Arc::clone(&store));
    println!("\nVision: {}% overall", vision.overall_progress());
    for area in vision.areas() {
        println!(
            "  {}: {}%",
            area.name,
            vision.area_progress(area.id).unwrap_or_default()
        );
    }

    let videos = VideosPage::mount(Arc::clone(&store));
    println!("\nPlaylists: {}", videos.playlists().len());
    for playlist in videos.playlists() {
        println!(
            "  {} [{:?}]: {}/{} watched, {}%",
            playlist.title,
            playlist.source,
            playlist.watched_count(),
            playlist.videos.len(),
            playlist.progress
        );
    }

    let dashboard = DashboardPage::mount(Arc::clone(&store));
    let summary = dashboard.summary(today);
    println!(
        "\nToday: {} tasks due, {} journal entries this week, mood: {}",
        summary.today_tasks.len(),
        summary.journal_entries,
        summary.top_mood.unwrap_or("-")
    );
    let quote = dashboard.daily_quote(today);
    println!("  \"{}\" ({})", quote.text, quote.author);

    let session = AuthSession::mount(store);
    println!("\nSigned in: {}", session.is_authenticated());
}
