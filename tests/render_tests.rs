mod common;

use common::fixtures::sample_layout;
use common::pdf_assertions::*;
use common::{GeneratedPdf, TestResult, init_logger, render_layout};
use placard::{ExportError, FieldValues, MissingFieldPolicy, PageType, RenderOptions};
use placard_model::{Element, ElementKind, Position, SemanticField};
use placard_render_core::RenderError;
use placard_render_lopdf::QR_UNAVAILABLE_LABEL;
use placard_traits::UnavailableQrProvider;
use std::sync::Arc;

fn assert_close(actual: f32, expected: f32) {
    assert!((actual - expected).abs() < 0.01, "expected {} got {}", expected, actual);
}

#[test]
fn test_page_size_follows_page_type() -> TestResult {
    init_logger();
    let pdf = render_layout(&sample_layout(PageType::A5Landscape), &FieldValues::new())?;
    assert_eq!(pdf.page_count(), 1);

    let [x0, y0, x1, y1] = media_box(&pdf.doc).ok_or("page has no MediaBox")?;
    assert_close(x0, 0.0);
    assert_close(y0, 0.0);
    assert_close(x1, 595.276);
    assert_close(y1, 419.528);
    Ok(())
}

#[test]
fn test_unbound_fields_show_placeholders_in_preview() -> TestResult {
    init_logger();
    let pdf = render_layout(&sample_layout(PageType::Square), &FieldValues::new())?;
    let text = shown_text(&pdf.doc);
    assert!(text.contains("Your Business Name"), "got: {}", text);
    assert!(text.contains("NEW"));
    Ok(())
}

#[test]
fn test_supplied_fields_replace_placeholders() -> TestResult {
    init_logger();
    let fields = FieldValues::new().with(SemanticField::BusinessName, "Corner Cafe");
    let pdf = render_layout(&sample_layout(PageType::Square), &fields)?;
    let text = shown_text(&pdf.doc);
    assert!(text.contains("Corner Cafe"));
    assert!(!text.contains("Your Business Name"));
    assert!(font_names(&pdf.doc).contains(&"Helvetica".to_string()));
    Ok(())
}

#[test]
fn test_qr_code_is_drawn_as_vector_paths() -> TestResult {
    init_logger();
    let pdf = render_layout(&sample_layout(PageType::A6Portrait), &FieldValues::new())?;
    assert!(count_operator(&pdf.doc, "m") > 20, "expected QR module runs");
    assert!(!shown_text(&pdf.doc).contains(QR_UNAVAILABLE_LABEL));
    Ok(())
}

#[test]
fn test_failed_qr_degrades_to_placeholder() -> TestResult {
    init_logger();
    let bytes = placard::export_single_with(
        &sample_layout(PageType::A6Portrait),
        &FieldValues::new(),
        Arc::new(UnavailableQrProvider),
        &RenderOptions::default(),
    )?;
    let pdf = GeneratedPdf::from_bytes(bytes)?;
    assert!(shown_text(&pdf.doc).contains(QR_UNAVAILABLE_LABEL));
    assert!(shown_text(&pdf.doc).contains("NEW"));
    Ok(())
}

#[test]
fn test_rotation_and_opacity_stay_inside_their_element() -> TestResult {
    init_logger();
    let mut layout = sample_layout(PageType::A4Portrait);
    for element in layout.elements.iter_mut() {
        if element.id.as_str() == "badge" {
            element.rotation = 30.0;
            element.opacity = 0.4;
        }
    }
    let pdf = render_layout(&layout, &FieldValues::new())?;
    assert_balanced_state(&pdf.doc);
    assert!(count_operator(&pdf.doc, "gs") >= 1);
    assert!(count_operator(&pdf.doc, "cm") >= 2);
    Ok(())
}

#[test]
fn test_title_is_written_to_document_info() -> TestResult {
    init_logger();
    let bytes = placard::export_single_with(
        &sample_layout(PageType::Square),
        &FieldValues::new(),
        Arc::new(placard::QrcodeProvider),
        &RenderOptions::default().with_title("Table cards"),
    )?;
    let pdf = GeneratedPdf::from_bytes(bytes)?;
    assert_eq!(info_title(&pdf.doc).as_deref(), Some("Table cards"));
    Ok(())
}

#[test]
fn test_fail_policy_rejects_missing_field() {
    init_logger();
    let result = placard::export_single_with(
        &sample_layout(PageType::Square),
        &FieldValues::new(),
        Arc::new(placard::QrcodeProvider),
        &RenderOptions::default().with_missing_fields(MissingFieldPolicy::Fail),
    );
    match result {
        Err(ExportError::Render(RenderError::MissingField { element, field })) => {
            assert_eq!(element, "name");
            assert_eq!(field, "business_name");
        }
        other => panic!("expected missing field error, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_duplicate_element_ids_are_rejected() {
    init_logger();
    let center = Position { x: 50.0, y: 50.0 };
    let layout = placard::Layout::new(PageType::Square)
        .with_element(Element::new(ElementKind::Text, center).with_id("a"))
        .with_element(Element::new(ElementKind::Text, center).with_id("a"));
    let result = placard::export_single(&layout, &FieldValues::new());
    assert!(matches!(result, Err(ExportError::Render(RenderError::Layout(_)))));
}

#[test]
fn test_layout_json_round_trips_through_render() -> TestResult {
    init_logger();
    let json = sample_layout(PageType::BusinessCard).to_json()?;
    let layout = placard::Layout::from_json(&json)?;
    let pdf = render_layout(&layout, &FieldValues::new())?;
    let [_, _, w, h] = media_box(&pdf.doc).ok_or("page has no MediaBox")?;
    assert!(w > h);
    Ok(())
}
