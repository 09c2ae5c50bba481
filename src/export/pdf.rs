//! PDF rendering of a session report via `printpdf`.
//!
//! A4 portrait, built-in Helvetica fonts, manual y-cursor with page breaks.
//! The grid content comes pre-shaped from the table projection; this module
//! only lays it out.

use std::io::BufWriter;

use printpdf::*;

use super::ExportError;
use crate::models::{Patient, Session, Therapist};
use crate::projection::{SessionTables, TableBlock};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TOP_Y: f32 = 280.0;
const BOTTOM_Y: f32 = 22.0;
const USABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Render a full session report. Returns PDF bytes.
pub fn generate_session_pdf(
    patient: &Patient,
    session: &Session,
    therapist: Option<&Therapist>,
    tables: &SessionTables,
) -> Result<Vec<u8>, ExportError> {
    let mut report = ReportWriter::new("Compte Rendu de Séance")?;

    // ─── Header ───
    report.text("Compte Rendu de Séance", 16.0, MARGIN, &FontKind::Bold);
    report.advance(6.0);
    report.text("Somatopathie & Thérapie Manuelle", 9.0, MARGIN, &FontKind::Regular);
    if let Some(t) = therapist {
        if !t.name.is_empty() {
            report.text(&format!("{} - {}", t.name, t.title), 9.0, 120.0, &FontKind::Regular);
        }
    }
    report.advance(10.0);

    // ─── Patient ───
    report.text(
        &format!("PATIENT: {}", patient.name.to_uppercase()),
        11.0,
        MARGIN,
        &FontKind::Bold,
    );
    report.advance(5.5);
    let dob = patient
        .dob
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    report.text(&format!("Né(e) le: {dob}"), 10.0, MARGIN, &FontKind::Regular);
    report.text(
        &format!("Date de séance: {}", session.date.format("%d/%m/%Y")),
        10.0,
        120.0,
        &FontKind::Regular,
    );
    report.advance(10.0);

    // ─── Anamnesis / notes ───
    if !session.anamnesis.is_empty() || !session.comments.is_empty() {
        report.heading("Anamnèse & Notes");
        if !session.anamnesis.is_empty() {
            report.paragraph(&format!("Anamnèse: {}", session.anamnesis), 10.0);
        }
        if !session.comments.is_empty() {
            report.paragraph(&format!("Commentaires: {}", session.comments), 10.0);
        }
        report.advance(6.0);
    }

    // ─── Grid tables ───
    for block in &tables.sections {
        report.ensure_space(20.0);
        report.text(&block.title, 13.0, MARGIN, &FontKind::Bold);
        report.advance(if block.grouped { 7.0 } else { 6.0 });
        for table in &block.tables {
            report.render_table(table, block.grouped);
        }
        report.advance(4.0);
    }

    // ─── AI analysis ───
    if let Some(analysis) = session.analysis.as_deref().filter(|s| !s.is_empty()) {
        report.ensure_space(30.0);
        report.heading("Analyse IA & Pistes de réflexion");
        report.paragraph(analysis, 10.0);
        report.advance(6.0);
    }

    // ─── Symbolic appendix ───
    if !tables.appendix.is_empty() {
        report.ensure_space(30.0);
        report.heading("Synthèse Symbolique & Interprétations");
        for row in &tables.appendix {
            report.ensure_space(16.0);
            report.text(&row.element, 10.0, MARGIN, &FontKind::Bold);
            report.advance(5.0);
            if row.psych != "-" {
                report.paragraph(&format!("Psychisme: {}", row.psych), 9.0);
            }
            if row.lien != "-" {
                report.paragraph(&format!("Lien Pied: {}", row.lien), 9.0);
            }
            report.advance(2.0);
        }
    }

    report.finish(patient, therapist)
}

enum FontKind {
    Regular,
    Bold,
}

struct ReportWriter {
    doc: PdfDocumentReference,
    pages: Vec<PdfPageIndex>,
    layer: PdfLayerReference,
    y: f32,
    font: IndirectFontRef,
    bold: IndirectFontRef,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

        Ok(Self {
            doc,
            pages: vec![page1],
            layer,
            y: TOP_Y,
            font,
            bold,
        })
    }

    fn font(&self, kind: &FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.font,
            FontKind::Bold => &self.bold,
        }
    }

    /// Write text at the cursor line without advancing it.
    fn text(&mut self, text: &str, size: f32, x: f32, kind: &FontKind) {
        self.layer
            .use_text(text, size, Mm(x), Mm(self.y), self.font(kind));
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Break to a new page when fewer than `needed` millimeters remain.
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_Y {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.pages.push(page);
            self.y = TOP_Y;
        }
    }

    fn heading(&mut self, text: &str) {
        self.ensure_space(14.0);
        self.text(text, 13.0, MARGIN, &FontKind::Bold);
        self.advance(7.0);
    }

    /// Word-wrapped body text.
    fn paragraph(&mut self, text: &str, size: f32) {
        for raw_line in text.lines() {
            for line in wrap_text(raw_line, 95) {
                self.ensure_space(6.0);
                self.text(&line, size, MARGIN, &FontKind::Regular);
                self.advance(4.8);
            }
        }
    }

    /// One projected table: header row plus body rows at fixed column slots.
    fn render_table(&mut self, table: &TableBlock, compact: bool) {
        let size = if compact { 7.0 } else { 8.5 };
        let row_height = if compact { 4.5 } else { 5.5 };

        self.ensure_space(row_height * (table.rows.len() as f32 + 2.0) + 8.0);

        if let Some(title) = &table.title {
            self.text(title, 10.0, MARGIN, &FontKind::Bold);
            self.advance(5.0);
        }

        let cols = table.header.len().max(1);
        let col_width = USABLE_WIDTH / cols as f32;
        // Rough glyph budget per cell for the chosen font size.
        let max_chars = (col_width / (size * 0.24)).max(3.0) as usize;

        for (i, cell) in table.header.iter().enumerate() {
            let x = MARGIN + col_width * i as f32;
            self.text(&fit(cell, max_chars), size, x, &FontKind::Bold);
        }
        self.advance(row_height);

        for row in &table.rows {
            self.ensure_space(row_height);
            for (i, cell) in row.iter().enumerate() {
                let x = MARGIN + col_width * i as f32;
                self.text(&fit(cell, max_chars), size, x, &FontKind::Regular);
            }
            self.advance(row_height);
        }
        self.advance(if compact { 3.0 } else { 5.0 });
    }

    /// Stamp footers on every page, then serialize.
    fn finish(self, patient: &Patient, therapist: Option<&Therapist>) -> Result<Vec<u8>, ExportError> {
        let total = self.pages.len();
        let generated = format!(
            "Document généré le {}",
            chrono::Local::now().format("%d/%m/%Y")
        );
        let contact = therapist.map(Therapist::contact_line).unwrap_or_default();

        for (i, page) in self.pages.iter().enumerate() {
            let footer = self.doc.get_page(*page).add_layer("Footer");
            if !contact.is_empty() {
                footer.use_text(&contact, 8.0, Mm(60.0), Mm(15.0), &self.font);
            }
            footer.use_text(
                format!(
                    "Compte-rendu de Séance - {} - Page {} sur {}",
                    if patient.name.is_empty() { "Inconnu" } else { &patient.name },
                    i + 1,
                    total
                ),
                8.0,
                Mm(60.0),
                Mm(10.0),
                &self.font,
            );
            footer.use_text(&generated, 8.0, Mm(MARGIN), Mm(10.0), &self.font);
        }

        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
    }
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Truncate a cell to its column's glyph budget.
fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars.saturating_sub(1)).chain(['…']).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridBundle, ReferenceData, SubFlag};
    use crate::interpretations::InterpretationCatalog;
    use crate::models::Section;
    use crate::projection::project_session_tables;

    fn sample() -> (Patient, Session, SessionTables) {
        let reference = ReferenceData::bundled().unwrap();
        let catalog = InterpretationCatalog::bundled().unwrap();

        let mut patient = Patient::new("Marie Dupont");
        patient.dob = chrono::NaiveDate::from_ymd_opt(1975, 11, 3);

        let mut session = Session::new(patient.id);
        session.anamnesis = "Migraines depuis trois semaines".into();
        session.comments = "Bonne détente en fin de séance".into();
        session.analysis = Some("Hypothèse: surcharge émotionnelle hépatique.".into());
        session.grids = GridBundle::empty()
            .toggle_cell(&reference, Section::Poyet, 0, 7)
            .toggle_sub_flag(Section::Organes, 0, 2, SubFlag::Intrinsic)
            .unwrap()
            .assign_cell(Section::Sutures, 0, 1, "/");

        let tables = project_session_tables(&session.grids, &reference, &catalog);
        (patient, session, tables)
    }

    #[test]
    fn report_produces_pdf_bytes() {
        let (patient, session, tables) = sample();
        let bytes = generate_session_pdf(&patient, &session, None, &tables).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn report_accepts_a_therapist_letterhead() {
        let (patient, session, tables) = sample();
        let therapist = Therapist {
            name: "Claire Morel".into(),
            phone: "06 12 34 56 78".into(),
            ..Therapist::default()
        };
        let bytes =
            generate_session_pdf(&patient, &session, Some(&therapist), &tables).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_session_still_renders() {
        let patient = Patient::new("Marie Dupont");
        let session = Session::new(patient.id);
        let tables = SessionTables::default();
        let bytes = generate_session_pdf(&patient, &session, None, &tables).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_analysis_spans_pages() {
        let (patient, mut session, tables) = sample();
        session.analysis = Some("Piste transgénérationnelle à explorer. ".repeat(200));
        let bytes = generate_session_pdf(&patient, &session, None, &tables).unwrap();
        // More than one page object in the document.
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Page"));
        assert!(bytes.len() > 2000);
    }

    #[test]
    fn wrap_text_respects_the_budget() {
        let lines = wrap_text("un deux trois quatre cinq six sept huit", 12);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
    }

    #[test]
    fn wrap_text_of_empty_input_is_one_blank_line() {
        assert_eq!(wrap_text("", 20), vec![String::new()]);
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("court", 10), "court");
        assert_eq!(fit("Temporo-occipitale", 8), "Temporo…");
    }
}
