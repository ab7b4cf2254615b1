// src/report/pdf.rs
use crate::extractors::ClassificationResult;
use crate::report::{row_cells, HEADERS, REPORT_TITLE};
use crate::utils::error::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

// --- Page Geometry (A4, points) ---
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 72.0;
const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const FRAME_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN;

// --- Typography ---
const TITLE_SIZE: f32 = 18.0;
const TITLE_BLOCK: f32 = 22.0 + 6.0 + 12.0; // leading, space after, spacer
const CELL_SIZE: f32 = 10.0;
const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_TOP: f32 = 3.0;
const BODY_PAD_BOTTOM: f32 = 3.0;
const HEADER_PAD_BOTTOM: f32 = 12.0;
const HEADER_HEIGHT: f32 = CELL_SIZE * 1.2 + CELL_PAD_TOP + HEADER_PAD_BOTTOM;
const ROW_HEIGHT: f32 = CELL_SIZE * 1.2 + CELL_PAD_TOP + BODY_PAD_BOTTOM;
const BOLD_WIDTH_FACTOR: f32 = 1.07;

// --- Colors (RGB) ---
const DARK_GRAY: [f32; 3] = [0.663, 0.663, 0.663];
const WHITE_SMOKE: [f32; 3] = [0.961, 0.961, 0.961];
const BEIGE: [f32; 3] = [0.961, 0.961, 0.863];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

const ELLIPSIS: &str = "...";

/// Renders the A4 summary: title, then the results table with its header row
/// repeated on every page and alternating row backgrounds.
pub fn render_summary(results: &[ClassificationResult]) -> Result<Vec<u8>, RenderError> {
    let rows: Vec<[String; 3]> = results
        .iter()
        .map(|r| row_cells(r).map(str::to_string))
        .collect();
    let (widths, rows) = fit_columns(rows);
    let table_width: f32 = widths.iter().sum();
    let table_x = MARGIN + (FRAME_WIDTH - table_width) / 2.0;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (page_index, page_rows) in paginate(rows.len()).into_iter().enumerate() {
        let mut ops = Vec::new();
        let mut top = PAGE_HEIGHT - MARGIN;

        if page_index == 0 {
            push_text(&mut ops, "F2", TITLE_SIZE, BLACK, MARGIN, top - TITLE_SIZE, REPORT_TITLE);
            top -= TITLE_BLOCK;
        }

        let header: [String; 3] = HEADERS.map(str::to_string);
        draw_row(&mut ops, &header, &widths, table_x, top - HEADER_HEIGHT, HEADER_HEIGHT, DARK_GRAY, WHITE_SMOKE, true);
        top -= HEADER_HEIGHT;

        for row_index in page_rows {
            let fill = if row_index % 2 == 0 { BEIGE } else { WHITE };
            draw_row(&mut ops, &rows[row_index], &widths, table_x, top - ROW_HEIGHT, ROW_HEIGHT, fill, BLACK, false);
            top -= ROW_HEIGHT;
        }

        let content = Content { operations: ops }
            .encode()
            .map_err(|e| RenderError::Content(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(REPORT_TITLE)),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Save(e.to_string()))?;

    tracing::debug!("Rendered PDF summary: {} rows, {} pages, {} bytes", rows.len(), page_count, buffer.len());
    Ok(buffer)
}

/// Row indices per page; the first page is shorter because of the title.
fn paginate(row_count: usize) -> Vec<Vec<usize>> {
    let first_capacity = ((FRAME_HEIGHT - TITLE_BLOCK - HEADER_HEIGHT) / ROW_HEIGHT).floor() as usize;
    let capacity = ((FRAME_HEIGHT - HEADER_HEIGHT) / ROW_HEIGHT).floor() as usize;

    let mut pages = vec![Vec::new()];
    let mut room = first_capacity;
    for index in 0..row_count {
        if room == 0 {
            pages.push(Vec::new());
            room = capacity;
        }
        if let Some(page) = pages.last_mut() {
            page.push(index);
        }
        room -= 1;
    }
    pages
}

/// Column widths sized to content; company names are truncated when the
/// table would not fit in the frame.
fn fit_columns(mut rows: Vec<[String; 3]>) -> ([f32; 3], Vec<[String; 3]>) {
    let mut widths = HEADERS.map(|h| text_width(h, CELL_SIZE) * BOLD_WIDTH_FACTOR + 2.0 * CELL_PAD_X);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = width.max(text_width(cell, CELL_SIZE) + 2.0 * CELL_PAD_X);
        }
    }

    let overflow = widths.iter().sum::<f32>() - FRAME_WIDTH;
    if overflow > 0.0 {
        widths[0] -= overflow;
        let max_text = widths[0] - 2.0 * CELL_PAD_X;
        for row in rows.iter_mut() {
            if text_width(&row[0], CELL_SIZE) > max_text {
                row[0] = truncate_to_width(&row[0], max_text, CELL_SIZE);
            }
        }
    }

    (widths, rows)
}

fn truncate_to_width(text: &str, max_width: f32, size: f32) -> String {
    let budget = max_width - text_width(ELLIPSIS, size);
    let mut out = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = char_width(c) * size / 1000.0;
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    ops: &mut Vec<Operation>,
    cells: &[String; 3],
    widths: &[f32; 3],
    x: f32,
    bottom: f32,
    height: f32,
    fill: [f32; 3],
    text_color: [f32; 3],
    header: bool,
) {
    let (font, pad_bottom) = if header { ("F2", HEADER_PAD_BOTTOM) } else { ("F1", BODY_PAD_BOTTOM) };
    let factor = if header { BOLD_WIDTH_FACTOR } else { 1.0 };

    let mut cell_x = x;
    for (cell, width) in cells.iter().zip(widths.iter()) {
        ops.push(Operation::new("rg", color_operands(fill)));
        ops.push(Operation::new("re", vec![cell_x.into(), bottom.into(), (*width).into(), height.into()]));
        ops.push(Operation::new("f", vec![]));

        ops.push(Operation::new("RG", color_operands(BLACK)));
        ops.push(Operation::new("w", vec![Object::Integer(1)]));
        ops.push(Operation::new("re", vec![cell_x.into(), bottom.into(), (*width).into(), height.into()]));
        ops.push(Operation::new("S", vec![]));

        let text_x = cell_x + (width - text_width(cell, CELL_SIZE) * factor) / 2.0;
        let baseline = bottom + pad_bottom + CELL_SIZE * 0.2;
        push_text(ops, font, CELL_SIZE, text_color, text_x, baseline, cell);

        cell_x += width;
    }
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: f32, color: [f32; 3], x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), size.into()]));
    ops.push(Operation::new("rg", color_operands(color)));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]));
    ops.push(Operation::new("ET", vec![]));
}

fn color_operands(color: [f32; 3]) -> Vec<Object> {
    color.iter().map(|c| (*c).into()).collect()
}

/// Encodes text for the standard fonts' WinAnsiEncoding; unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 || ((c as u32) >= 0xA0 && (c as u32) <= 0xFF) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * size / 1000.0
}

// Helvetica advance widths (1/1000 em); accented letters use their base letter
fn char_width(c: char) -> f32 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        278, 278, 278, 469, 556, 333, // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
        334, 260, 334, 584, // '{'..'~'
    ];

    let base = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        other => other,
    };

    match base as u32 {
        code @ 32..=126 => ASCII[(code - 32) as usize] as f32,
        _ => 556.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(company: &str) -> ClassificationResult {
        ClassificationResult { company: company.to_string(), rf_installment: false, pgfn_installment: true }
    }

    #[test]
    fn test_empty_summary_is_single_page() {
        let bytes = render_summary(&[]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_tables_repeat_header_on_each_page() {
        let results: Vec<ClassificationResult> = (0..100).map(|i| result(&format!("Empresa {}", i))).collect();
        let bytes = render_summary(&results).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), paginate(100).len());
        assert!(pages.len() > 1);

        let last = *pages.keys().last().unwrap();
        let text = doc.extract_text(&[last]).unwrap();
        assert!(text.contains("Parcelamento PGFN"));
        assert!(text.contains("Empresa 99"));
    }

    #[test]
    fn test_paginate_covers_every_row_once() {
        let pages = paginate(80);
        let flat: Vec<usize> = pages.into_iter().flatten().collect();
        assert_eq!(flat, (0..80).collect::<Vec<_>>());
        assert_eq!(paginate(0), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_long_names_are_truncated_to_fit() {
        let long_name = "Companhia Brasileira de Distribuição e Comércio de Produtos Agropecuários Ltda";
        let (widths, rows) = fit_columns(vec![row_cells(&result(long_name)).map(str::to_string)]);

        assert!(widths.iter().sum::<f32>() <= FRAME_WIDTH + 0.01);
        assert!(rows[0][0].ends_with(ELLIPSIS));
        assert!(text_width(&rows[0][0], CELL_SIZE) <= widths[0] - 2.0 * CELL_PAD_X + 0.01);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Não"), vec![b'N', 0xE3, b'o']);
        assert_eq!(encode_win_ansi("a–b"), vec![b'a', 0x96, b'b']);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
    }
}
