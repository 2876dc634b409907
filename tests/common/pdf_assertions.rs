use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};

/// Decoded operations of the first page's content streams
pub fn page_operations(doc: &LopdfDocument) -> Vec<Operation> {
    let Some(page_id) = doc.get_pages().values().next().copied() else {
        return Vec::new();
    };
    let bytes = doc.get_page_content(page_id).unwrap_or_default();
    Content::decode(&bytes).map(|c| c.operations).unwrap_or_default()
}

/// Every string shown with `Tj` on the first page, in drawing order
pub fn shown_strings(doc: &LopdfDocument) -> Vec<String> {
    page_operations(doc)
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| operand.as_str().ok())
        .map(|bytes| bytes.iter().map(|b| *b as char).collect())
        .collect()
}

/// All shown text joined with spaces, for substring checks
pub fn shown_text(doc: &LopdfDocument) -> String {
    shown_strings(doc).join(" ")
}

pub fn count_operator(doc: &LopdfDocument, operator: &str) -> usize {
    page_operations(doc).iter().filter(|op| op.operator == operator).count()
}

/// First page MediaBox as `[x0, y0, x1, y1]` in points
pub fn media_box(doc: &LopdfDocument) -> Option<[f32; 4]> {
    let page_id = doc.get_pages().values().next().copied()?;
    let page = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let values: Vec<f32> = page
        .get(b"MediaBox")
        .ok()?
        .as_array()
        .ok()?
        .iter()
        .filter_map(|o| o.as_float().ok())
        .collect();
    values.try_into().ok()
}

/// BaseFont names from the page resource dictionary
pub fn font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut names = Vec::new();
    for object in doc.objects.values() {
        if let Ok(dict) = object.as_dict()
            && dict.get(b"Type").and_then(|t| t.as_name()).ok() == Some(b"Font".as_slice())
            && let Ok(base) = dict.get(b"BaseFont").and_then(|b| b.as_name())
        {
            names.push(String::from_utf8_lossy(base).to_string());
        }
    }
    names.sort();
    names
}

/// Title from the document info dictionary
pub fn info_title(doc: &LopdfDocument) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_id).ok()?.as_dict().ok()?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(title).to_string())
}

/// Checks every `Q` closes an earlier `q` and nothing is left open
pub fn assert_balanced_state(doc: &LopdfDocument) {
    let mut depth = 0i32;
    for op in page_operations(doc) {
        match op.operator.as_str() {
            "q" => depth += 1,
            "Q" => {
                depth -= 1;
                assert!(depth >= 0, "Q without matching q");
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced graphics state");
}
