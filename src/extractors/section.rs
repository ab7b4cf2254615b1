// src/extractors/section.rs

// --- Section Titles ---
pub const RF_TITLE: &str = "Diagnóstico Fiscal na Receita Federal";
pub const PGFN_TITLE: &str = "Diagnóstico Fiscal na Procuradoria-Geral da Fazenda Nacional";

// --- Detection Markers ---
const RF_INSTALLMENT_MARKER: &str = "EM PARCELAMENTO";
const PGFN_INSTALLMENT_MARKER: &str = "Pendência - Parcelamento";

// Secondary markers: evaluated and logged, never change a flag
const RF_BASE_UNAVAILABLE_MARKER: &str = "BASE INDISPONÍVEL";
const RF_INSTALLMENT_MENTION: &str = "Parcelamento";
const PGFN_CLEAR_MARKER: &str = "Não foram detectadas pendências/exigibilidades suspensas";

// --- Data Structures ---

/// The two government sections of a fiscal situation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSections<'a> {
    /// From the Receita Federal title up to the PGFN title.
    pub receita_federal: &'a str,
    /// From the PGFN title to the end of the text.
    pub pgfn: &'a str,
}

/// Installment-plan status detected in each section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionStatus {
    pub rf_installment: bool,
    pub pgfn_installment: bool,
}

/// Splits report text on the two section titles.
///
/// The Receita Federal section is empty unless both titles are present and the
/// RF title comes first. The PGFN section is empty when its title is absent.
pub fn split_sections(text: &str) -> ReportSections<'_> {
    let rf_start = text.find(RF_TITLE);
    let pgfn_start = text.find(PGFN_TITLE);

    let receita_federal = match (rf_start, pgfn_start) {
        (Some(s1), Some(s2)) => text.get(s1..s2).unwrap_or(""),
        _ => "",
    };
    let pgfn = pgfn_start.map(|s2| &text[s2..]).unwrap_or("");

    if let (Some(s1), Some(s2)) = (rf_start, pgfn_start) {
        if s1 > s2 {
            tracing::warn!("Receita Federal title found after the PGFN title ({} > {}); RF section treated as empty", s1, s2);
        }
    }

    ReportSections { receita_federal, pgfn }
}

/// Classifies the full extracted text of one report.
pub fn classify_text(text: &str) -> SectionStatus {
    let sections = split_sections(text);

    let rf_installment = sections.receita_federal.contains(RF_INSTALLMENT_MARKER);
    if !rf_installment
        && sections.receita_federal.contains(RF_BASE_UNAVAILABLE_MARKER)
        && sections.receita_federal.contains(RF_INSTALLMENT_MENTION)
    {
        tracing::debug!("RF section reports '{}' and mentions '{}'; flag stays false", RF_BASE_UNAVAILABLE_MARKER, RF_INSTALLMENT_MENTION);
    }

    let pgfn_installment = sections.pgfn.contains(PGFN_INSTALLMENT_MARKER);
    if !pgfn_installment && sections.pgfn.contains(PGFN_CLEAR_MARKER) {
        tracing::debug!("PGFN section reports no pending items");
    }

    SectionStatus { rf_installment, pgfn_installment }
}
