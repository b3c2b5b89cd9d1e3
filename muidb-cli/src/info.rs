use muidb::{MuiDbFile, MuiDbState};
use serde_json::json;

/// Prints counts and the configured target files of a database.
pub fn print_info(db: &MuiDbFile, json_output: bool) -> Result<(), String> {
    let stats = db.stats();

    if json_output {
        let targets: Vec<_> = db
            .target_files()
            .iter()
            .map(|t| {
                json!({
                    "path": t.path,
                    "lang": t.lang,
                    "designer": t.designer_file(db.settings()),
                })
            })
            .collect();
        let body = json!({
            "project_title": db.project_title(),
            "base_name": db.base_name(),
            "code_namespace": db.code_namespace(),
            "configured_languages": db.languages(),
            "stats": stats,
            "target_files": targets,
        });
        let text = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    if let Some(title) = db.project_title() {
        println!("Project: {}", title);
    }
    println!("  items total : {}", stats.items);
    println!("  languages   : {}", stats.languages);
    for state in MuiDbState::enumerate() {
        println!("  # {:<10}: {}", state.as_str(), stats.count(state));
    }
    println!("  comments    : {}", stats.comments);

    println!("Configured output files:");
    for file in db.target_files() {
        match file.designer_file(db.settings()) {
            Some(designer) => println!(
                " - {} (lang={}, designer={}{})",
                file.path,
                file.lang,
                if designer.is_internal { "internal " } else { "public " },
                designer.class_name
            ),
            None => println!(" - {} (lang={})", file.path, file.lang),
        }
    }

    Ok(())
}
