use crate::service::DocSearch;

/// List every library with its versions.
pub async fn handle_list_libraries(docs: &DocSearch) -> Result<String, String> {
    let libraries = docs.list_libraries().await.map_err(|e| e.to_string())?;
    if libraries.is_empty() {
        return Ok("No libraries available.\n".to_string());
    }

    let mut output = format!("Libraries ({}):\n", libraries.len());
    for library in &libraries {
        output.push_str(&format!("  • {} v{}", library.name, library.latest_version));
        if let Some(description) = &library.description {
            output.push_str(&format!(" - {}", description));
        }
        output.push('\n');

        let older: Vec<&str> = library
            .versions
            .iter()
            .filter(|v| **v != library.latest_version)
            .map(String::as_str)
            .collect();
        if !older.is_empty() {
            output.push_str(&format!("    also: {}\n", older.join(", ")));
        }
    }
    Ok(output)
}
