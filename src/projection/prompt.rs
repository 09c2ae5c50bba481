//! Analysis prompt builders.
//!
//! Both prompts are French-language text blocks sent verbatim to the local
//! text-generation model. The session prompt describes one session's grids
//! element by element; the evolution prompt summarizes up to five sessions.

use crate::grid::{CellValue, GridBundle, ReferenceData};
use crate::interpretations::InterpretationCatalog;
use crate::models::{Patient, Section, Session};

/// Prefix of the string returned when fewer than two sessions exist.
/// Callers detect it and surface the full message to the user instead of
/// sending it to the model; it is not an error.
pub const NOT_ENOUGH_SESSIONS_PREFIX: &str = "Pas assez";

const NOT_ENOUGH_SESSIONS: &str =
    "Pas assez de séances pour une analyse d'évolution (minimum 2 séances requises).";

/// Build the single-session analysis prompt.
///
/// Only row 0 of each grid is described. A section contributes nothing when
/// row 0 is absent or carries no set cell.
pub fn build_session_prompt(
    patient: &Patient,
    session: &Session,
    reference: &ReferenceData,
    catalog: &InterpretationCatalog,
) -> String {
    let mut text = String::new();

    text.push_str("Tu es un praticien expert en somatopathie.\n");
    text.push_str("Réponds uniquement en français.\n");
    text.push_str(
        "Ton objectif est de relier les restrictions/corrections notées (zones, organes, \
         sutures, etc.) à des hypothèses de vécu émotionnel (traumas du passé) et, si \
         pertinent, à des pistes transgénérationnelles (ancêtres/lignée), en restant prudent \
         (conditionnel).\n",
    );
    text.push_str(
        "Ne pose pas de diagnostic médical, n'affirme pas de causalité certaine : formule \
         des hypothèses et propose des questions à explorer en séance.\n\n",
    );

    text.push_str(&format!(
        "Analyse cette séance de somatopathie pour le patient {}",
        patient.name
    ));
    if let Some(dob) = patient.dob {
        text.push_str(&format!(" (né(e) le {})", dob.format("%d/%m/%Y")));
    }
    text.push_str(".\n\n");

    if !patient.anamnesis.is_empty() {
        text.push_str(&format!(
            "**Anamnèse générale du patient:**\n{}\n\n",
            patient.anamnesis
        ));
    }
    if !session.anamnesis.is_empty() {
        text.push_str(&format!("**Motif de la séance:**\n{}\n\n", session.anamnesis));
    }
    if !session.comments.is_empty() {
        text.push_str(&format!(
            "**Commentaires de séance:**\n{}\n\n",
            session.comments
        ));
    }

    for section in Section::ALL {
        text.push_str(&describe_section(section, &session.grids, reference, catalog));
    }

    text.push_str("\n**Consigne de restitution:**\n");
    text.push_str(
        "Structure ta réponse exactement comme suit pour qu'elle soit lisible pendant la \
         séance :\n\n",
    );
    text.push_str("### 1. 3 QUESTIONS À POSER AU PATIENT\n");
    text.push_str(
        "Propose **3 questions clés**, courtes et percutantes, basées sur ton analyse, pour \
         aider le patient à faire des liens.\n\n",
    );
    text.push_str("### 2. DÉTAIL DES SYMBOLIQUES\n");
    text.push_str(
        "Pour chaque élément marquant relevé dans la séance, rappelle son nom et sa \
         symbolique (telle que fournie dans les données ou selon tes connaissances si \
         absent).\n\n",
    );
    text.push_str("### 3. SYNTHÈSE RAPIDE\n");
    text.push_str("Bref résumé des liens logiques ou transgénérationnels possibles.\n");

    text
}

/// One `**Section:**` block, or the empty string when row 0 has no data.
fn describe_section(
    section: Section,
    grids: &GridBundle,
    reference: &ReferenceData,
    catalog: &InterpretationCatalog,
) -> String {
    let meta = reference.section(section);
    let Some(row) = grids.section(section).get(&0) else {
        return String::new();
    };

    let mut text = format!("**{}:**\n", meta.title);
    let mut has_data = false;

    for (&col, value) in row {
        if col == 0 || !value.is_set() {
            continue;
        }
        let label = meta.column_label(col);
        let detail = match value {
            CellValue::DualFlag {
                intrinsic,
                physiologic,
            } => {
                let mut parts = Vec::new();
                if *intrinsic {
                    parts.push("Intrinsèque");
                }
                if *physiologic {
                    parts.push("Ysio");
                }
                parts.join(" + ")
            }
            CellValue::Mark(s) => s.clone(),
            CellValue::Directional(d) => d.as_arrow().to_string(),
            CellValue::Empty => continue,
        };
        text.push_str(&format!("  - {label}: {detail}\n"));
        has_data = true;

        if let Some(interp) = catalog.lookup(&label) {
            if let Some(lien) = interp.lien.filter(|s| !s.is_empty()) {
                text.push_str(&format!("    • Lien Pied: {lien}\n"));
            }
            if let Some(psych) = interp.psych.filter(|s| !s.is_empty()) {
                text.push_str(&format!("    • Psychisme: {psych}\n"));
            }
        }
    }

    if has_data {
        text.push('\n');
        text
    } else {
        String::new()
    }
}

/// Build the multi-session evolution prompt from a patient's history.
///
/// The five most recent sessions are presented in chronological order. With
/// fewer than two sessions the sentinel message is returned instead (detect
/// it with [`NOT_ENOUGH_SESSIONS_PREFIX`]).
pub fn build_evolution_prompt(patient: &Patient, sessions: &[Session]) -> String {
    let mut recent: Vec<&Session> = sessions.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(5);

    if recent.len() < 2 {
        return NOT_ENOUGH_SESSIONS.to_string();
    }

    // Oldest first for the trend narrative.
    recent.reverse();

    let mut text = String::new();
    text.push_str("Tu es un praticien expert en somatopathie.\n");
    text.push_str("Réponds uniquement en français.\n");
    text.push_str(
        "Analyse l'évolution en formulant des hypothèses (conditionnel) sur les mécanismes \
         psycho-émotionnels et transgénérationnels possibles.\n",
    );
    text.push_str("Ne pose pas de diagnostic médical.\n\n");

    text.push_str(&format!(
        "**Analyse de l'évolution du patient {}**\n",
        patient.name
    ));
    text.push_str(&format!("Nombre de séances analysées: {}\n\n", recent.len()));

    if !patient.anamnesis.is_empty() {
        text.push_str(&format!("**Anamnèse générale:** {}\n\n", patient.anamnesis));
    }

    for (i, session) in recent.iter().enumerate() {
        text.push_str(&format!(
            "--- Séance {} ({}) ---\n",
            i + 1,
            session.date.format("%d/%m/%Y")
        ));
        if !session.anamnesis.is_empty() {
            text.push_str(&format!("Motif: {}\n", session.anamnesis));
        }
        if let Some(notes) = session.notes.as_deref().filter(|s| !s.is_empty()) {
            text.push_str(&format!("Notes: {notes}\n"));
        }
        text.push_str(&format!(
            "Corrections: Poyet ({}), Organes ({}), Somato ({}), Sutures ({}), IO ({}), Spéc. ({})\n",
            session.grids.correction_count(Section::Poyet),
            session.grids.correction_count(Section::Organes),
            session.grids.correction_count(Section::Somato),
            session.grids.correction_count(Section::Sutures),
            session.grids.correction_count(Section::IntraOsseuse),
            session.grids.correction_count(Section::Specifique),
        ));
        if !session.comments.is_empty() {
            text.push_str(&format!("Commentaires: {}\n", session.comments));
        }
        text.push('\n');
    }

    text.push_str("**Question:**\nEn tant qu'expert en somatopathie, analyse l'évolution et fournis :\n");
    text.push_str("1. Les tendances observées (amélioration, stagnation, récurrence)\n");
    text.push_str("2. Les zones qui nécessitent encore attention\n");
    text.push_str("3. Les recommandations pour la suite du traitement\n");

    text
}
