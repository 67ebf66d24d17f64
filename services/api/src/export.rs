//! Export pipeline rendering the active employee set into CSV,
//! spreadsheet, and PDF byte streams
//!
//! All three renderers take the same employee slice, so one query
//! result feeds every format and they cannot diverge.

use anyhow::Result;
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use crate::models::Employee;

/// Column order shared by the CSV and spreadsheet formats
const EXPORT_COLUMNS: [&str; 9] = [
    "Emp Code",
    "Name",
    "Email",
    "Department",
    "Role",
    "Salary",
    "Join Date",
    "Phone",
    "Status",
];

/// PDF table columns and their left edge in millimeters
const PDF_COLUMNS: [(&str, f32); 6] = [
    ("Code", 15.0),
    ("Name", 40.0),
    ("Email", 80.0),
    ("Dept", 130.0),
    ("Role", 155.0),
    ("Salary", 180.0),
];

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

/// Render the employee set as UTF-8 CSV prefixed with a byte-order mark
pub fn render_csv(employees: &[Employee]) -> Result<Vec<u8>> {
    // BOM so spreadsheet applications pick up the encoding
    let buf = vec![0xEF, 0xBB, 0xBF];
    let mut writer = csv::Writer::from_writer(buf);

    writer.write_record(EXPORT_COLUMNS)?;
    for emp in employees {
        writer.write_record([
            emp.emp_code.as_str(),
            emp.name.as_str(),
            emp.email.as_str(),
            emp.department.as_str(),
            emp.role.as_str(),
            &emp.salary.to_string(),
            emp.join_date.as_str(),
            emp.phone.as_str(),
            emp.status.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e.into_error()))?;

    Ok(bytes)
}

/// Render the employee set as a single-sheet workbook
pub fn render_xlsx(employees: &[Employee]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Employees")?;

    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, emp) in employees.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &emp.emp_code)?;
        worksheet.write_string(row, 1, &emp.name)?;
        worksheet.write_string(row, 2, &emp.email)?;
        worksheet.write_string(row, 3, &emp.department)?;
        worksheet.write_string(row, 4, &emp.role)?;
        worksheet.write_number(row, 5, emp.salary)?;
        worksheet.write_string(row, 6, &emp.join_date)?;
        worksheet.write_string(row, 7, &emp.phone)?;
        worksheet.write_string(row, 8, emp.status.as_str())?;
    }

    let bytes = workbook.save_to_buffer()?;

    Ok(bytes)
}

/// Render the employee report as a PDF document
///
/// Carries a title, the UTC generation timestamp, and the requesting
/// user's name above a styled table.
pub fn render_pdf(employees: &[Employee], generated_by: &str) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Employee Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut current = doc.get_page(page).get_layer(layer);

    current.use_text("Employee Report", 24.0, Mm(70.0), Mm(260.0), &bold);
    current.use_text(
        format!(
            "Generated on: {} UTC",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        ),
        10.0,
        Mm(15.0),
        Mm(250.0),
        &regular,
    );
    current.use_text(
        format!("Generated by: {}", generated_by),
        10.0,
        Mm(15.0),
        Mm(245.0),
        &regular,
    );

    let mut y = 235.0;
    draw_table_header(&current, &bold, y);
    y -= 7.0;

    for emp in employees {
        if y < 15.0 {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = 260.0;
            draw_table_header(&current, &bold, y);
            y -= 7.0;
        }

        let cells = [
            emp.emp_code.clone(),
            fit(&emp.name, 24),
            fit(&emp.email, 30),
            fit(&emp.department, 14),
            fit(&emp.role, 14),
            format_currency(emp.salary),
        ];
        for ((_, x), cell) in PDF_COLUMNS.iter().zip(cells) {
            current.use_text(cell, 8.0, Mm(*x), Mm(y), &regular);
        }
        y -= 6.0;
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| anyhow::anyhow!("Failed to serialize PDF export: {}", e))?;

    Ok(bytes)
}

fn draw_table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
    for (header, x) in PDF_COLUMNS {
        layer.use_text(header, 9.0, Mm(x), Mm(y), bold);
    }
}

/// Currency string with thousands separators and two decimal places
fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (formatted.as_str(), "00"),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    format!("${}.{}", grouped, frac_part)
}

/// Truncate cell text so it stays inside its column
fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
