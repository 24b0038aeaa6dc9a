use crate::protocol::SelectionRecord;

/// Attributes that never add anything to a summary line.
const SKIPPED_ATTRIBUTES: &[&str] = &["style"];

pub fn format_record(record: &SelectionRecord) -> String {
    let text = if record.inner_text.is_empty() {
        "(no text)"
    } else {
        record.inner_text.as_str()
    };

    let mut output = format!("{} \"{}\"\n", record.tag_name, text);
    output.push_str(&format!("  selector: {}\n", record.selector));
    output.push_str(&format!("  strategy: {}\n", record.strategy));
    if !record.hosts.is_empty() {
        output.push_str(&format!("  hosts: {}\n", record.hosts.join(" >>> ")));
    }

    let attrs: Vec<String> = record
        .attributes
        .iter()
        .filter(|(name, _)| !SKIPPED_ATTRIBUTES.contains(name))
        .map(|(name, value)| format!("{}=\"{}\"", name, value))
        .collect();
    if !attrs.is_empty() {
        output.push_str(&format!("  attributes: {}\n", attrs.join(", ")));
    }
    if !record.url.is_empty() {
        output.push_str(&format!("  url: {}\n", record.url));
    }

    output
}
