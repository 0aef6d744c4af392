//! Project initialization for lanes
//!
//! `lanes init` creates the `.lanes/` directory, a default config and a
//! seeded board database.

use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::{Config, CONFIG_FILE};
use crate::db::{Database, DB_FILE, LANES_DIR};

/// Initialize lanes in `root`. Safe to re-run: existing files are kept.
pub fn init_project(root: &Path) -> Result<(), String> {
    println!("\n{}", "Initializing lanes...".cyan().bold());
    println!("   Directory: {}\n", root.display());

    let lanes_dir = root.join(LANES_DIR);
    create_dir_if_missing(&lanes_dir)?;

    let config_path = lanes_dir.join(CONFIG_FILE);
    write_file_if_missing(
        &config_path,
        &Config::default_toml(),
        &format!("{}/{}", LANES_DIR, CONFIG_FILE),
    )?;

    let db_path = lanes_dir.join(DB_FILE);
    let existed = db_path.exists();
    let db = Database::open_at(&db_path)
        .map_err(|e| format!("Could not create {}: {}", db_path.display(), e))?;
    if existed {
        println!("   {} {}/{} (already exists)", "Skipping".yellow(), LANES_DIR, DB_FILE);
    } else {
        let board = db
            .fetch_all()
            .map_err(|e| format!("Could not read new board: {}", e))?;
        println!(
            "   {} {}/{} ({} statuses, {} contexts, {} tasks)",
            "Creating".green(),
            LANES_DIR,
            DB_FILE,
            board.statuses.len(),
            board.contexts.len(),
            board.tasks.len()
        );
    }

    add_to_gitignore(root)?;

    println!("\n{}", "lanes initialized!".green().bold());
    println!("\nNext steps:");
    println!("  1. Run {} to open the board", "lanes".cyan());
    println!("  2. Run {} to add a task from the shell", "lanes add \"Title\"".cyan());
    println!();

    Ok(())
}

fn create_dir_if_missing(path: &Path) -> Result<(), String> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| format!("Could not create {}: {}", path.display(), e))?;
        println!("   {} {}", "Creating".green(), path.display());
    }
    Ok(())
}

fn write_file_if_missing(path: &Path, content: &str, display_name: &str) -> Result<(), String> {
    if path.exists() {
        println!("   {} {} (already exists)", "Skipping".yellow(), display_name);
    } else {
        fs::write(path, content)
            .map_err(|e| format!("Could not write {}: {}", display_name, e))?;
        println!("   {} {}", "Creating".green(), display_name);
    }
    Ok(())
}

fn add_to_gitignore(root: &Path) -> Result<(), String> {
    let gitignore_path = root.join(".gitignore");
    let entry = ".lanes/";

    if gitignore_path.exists() {
        let existing = fs::read_to_string(&gitignore_path)
            .map_err(|e| format!("Could not read .gitignore: {}", e))?;

        if existing.lines().any(|line| line.trim() == entry || line.trim() == LANES_DIR) {
            return Ok(());
        }

        let new_content = format!("{}\n\n# lanes board (local)\n{}\n", existing.trim_end(), entry);
        fs::write(&gitignore_path, new_content)
            .map_err(|e| format!("Could not update .gitignore: {}", e))?;
        println!("   {} .gitignore (added .lanes/)", "Updated".green());
    } else if root.join(".git").exists() {
        let content = format!("# lanes board (local)\n{}\n", entry);
        fs::write(&gitignore_path, content)
            .map_err(|e| format!("Could not create .gitignore: {}", e))?;
        println!("   {} .gitignore", "Creating".green());
    }

    Ok(())
}
