use anyhow::Result;

use super::App;
use super::folder::warn_if_unsaved;

pub async fn categories(app: &App) -> Result<()> {
    let categories = app.rotation.list_categories().await?;
    if categories.is_empty() {
        println!("The prompt folder has no categories.");
    }
    for category in categories {
        println!("{}", category);
    }
    Ok(())
}

pub async fn next(app: &App, category: &str) -> Result<()> {
    match app.rotation.get_next(category).await? {
        Some(selection) => {
            println!("# {}", selection.handle);
            println!();
            println!("{}", selection.content.trim_end());
        }
        None => println!("No prompts in '{}'.", category),
    }
    warn_if_unsaved(app);
    Ok(())
}

pub async fn status(app: &App, category: &str) -> Result<()> {
    match app.rotation.category_status(category).await {
        Some(status) => println!(
            "{}: {} shown, {} remaining in this cycle",
            category, status.shown, status.remaining
        ),
        None => println!("{}: no prompts shown yet", category),
    }
    Ok(())
}

pub async fn reset(app: &App, category: Option<&str>) -> Result<()> {
    match category {
        Some(category) => {
            if app.rotation.reset_category(category).await {
                println!("Forgot the history of '{}'.", category);
            } else {
                println!("'{}' has no history.", category);
            }
        }
        None => {
            app.rotation.reset_all().await;
            println!("Forgot the history of every category.");
        }
    }
    warn_if_unsaved(app);
    Ok(())
}
