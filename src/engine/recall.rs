//! Read path — three-phase retrieval with confidence gating.
//!
//! Phase 1 matches query keywords against stored contexts. Phase 2 spreads
//! activation one hop outward from the Phase-1 frontier along high-weight
//! synapses. Phase 3 falls back to the most myelinated neurons of the
//! requested type when the first two phases come up short. Results are ranked
//! by confidence and truncated to the caller's limit.
//!
//! Spread is strictly 1-hop: neurons activated in Phase 2 are not themselves
//! expanded.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

use super::types::{ActivationPath, Neuron, NeuronType, RecallResult, NEURON_COLUMNS};
use super::{
    CONFIDENCE_GATE, DIRECT_MATCH_LIMIT, MYELINATED_GATE, RECENCY_WINDOW_MS, SPREAD_FANOUT_LIMIT,
    SPREAD_WEIGHT_FLOOR,
};

/// Run the full three-phase recall.
pub(crate) fn recall_query(
    conn: &Connection,
    query: &str,
    neuron_type: NeuronType,
    limit: usize,
) -> Result<Vec<RecallResult>> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let keywords = extract_keywords(query);
    let mut activated: HashSet<String> = HashSet::new();
    let mut results: Vec<RecallResult> = Vec::new();

    // Phase 1: direct keyword match against stored contexts.
    for neuron in direct_candidates(conn, &keywords)? {
        if neuron.neuron_type != neuron_type || activated.contains(&neuron.id) {
            continue;
        }
        let confidence = score_neuron(&neuron, &keywords);
        if confidence >= CONFIDENCE_GATE {
            activated.insert(neuron.id.clone());
            results.push(RecallResult {
                neuron,
                confidence,
                activation_path: ActivationPath::Direct,
            });
        }
    }

    // Phase 2: 1-hop spread from the Phase-1 frontier only.
    let frontier: Vec<(String, f64)> = results
        .iter()
        .map(|r| (r.neuron.id.clone(), r.confidence))
        .collect();
    for (seed_id, seed_confidence) in frontier {
        for (target_id, weight) in outgoing_synapses(conn, &seed_id)? {
            if weight < SPREAD_WEIGHT_FLOOR || activated.contains(&target_id) {
                continue;
            }
            // The target row may have been pruned between phase queries.
            let Some(target) = fetch_neuron(conn, &target_id)? else {
                continue;
            };
            if target.neuron_type != neuron_type {
                continue;
            }
            let confidence = (seed_confidence * weight * (1.0 + target.myelination)).min(0.99);
            if confidence >= CONFIDENCE_GATE {
                activated.insert(target_id);
                results.push(RecallResult {
                    neuron: target,
                    confidence,
                    activation_path: ActivationPath::Spread,
                });
            }
        }
    }

    // Phase 3: myelinated fallback until the limit is reached.
    if results.len() < limit {
        let wanted = limit - results.len();
        for neuron in myelinated_candidates(conn, neuron_type, &activated, wanted)? {
            let confidence = neuron.myelination * 0.5;
            if confidence < MYELINATED_GATE {
                // Candidates arrive in descending myelination; the rest fail too.
                break;
            }
            activated.insert(neuron.id.clone());
            results.push(RecallResult {
                neuron,
                confidence,
                activation_path: ActivationPath::Myelinated,
            });
            if results.len() >= limit {
                break;
            }
        }
    }

    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    Ok(results)
}

/// Lower-case the query, split on whitespace, and drop short tokens.
pub(crate) fn extract_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Confidence score for a neuron against a keyword set.
///
/// Weighted blend of context overlap, long-term trust, recency within a
/// one-week window, and path overlap; clamped to 1.
pub(crate) fn score_neuron(neuron: &Neuron, keywords: &[String]) -> f64 {
    let (ctx_match, path_match) = if keywords.is_empty() {
        (0.0, 0.0)
    } else {
        let context_str = neuron.contexts.join(" ").to_lowercase();
        let path = neuron.path.to_lowercase();
        let ctx_hits = keywords.iter().filter(|k| context_str.contains(k.as_str())).count();
        let path_hits = keywords.iter().filter(|k| path.contains(k.as_str())).count();
        (
            ctx_hits as f64 / keywords.len() as f64,
            path_hits as f64 / keywords.len() as f64,
        )
    };

    let recency = neuron
        .last_accessed
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| {
            let age_ms = (Utc::now() - ts.with_timezone(&Utc)).num_milliseconds() as f64;
            (1.0 - age_ms / RECENCY_WINDOW_MS).max(0.0)
        })
        .unwrap_or(0.0);

    (0.4 * ctx_match + 0.3 * neuron.myelination + 0.2 * recency + 0.1 * path_match).min(1.0)
}

/// Phase-1 candidates: per-keyword LIKE match on the contexts column,
/// myelination-descending, deduplicated across keywords.
fn direct_candidates(conn: &Connection, keywords: &[String]) -> Result<Vec<Neuron>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    let sql = format!(
        "SELECT {NEURON_COLUMNS} FROM neurons WHERE contexts LIKE ?1 ESCAPE '\\' \
         ORDER BY myelination DESC LIMIT {DIRECT_MATCH_LIMIT}"
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    for keyword in keywords {
        let pattern = format!("%{}%", escape_like(keyword));
        let rows = stmt
            .query_map(params![pattern], Neuron::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        for neuron in rows {
            if seen.insert(neuron.id.clone()) {
                candidates.push(neuron);
            }
        }
    }

    Ok(candidates)
}

/// Escape LIKE wildcards in a keyword so it matches literally.
fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Strongest outgoing synapses of a frontier neuron.
fn outgoing_synapses(conn: &Connection, source_id: &str) -> Result<Vec<(String, f64)>> {
    let sql = format!(
        "SELECT target_id, weight FROM synapses WHERE source_id = ?1 \
         ORDER BY weight DESC LIMIT {SPREAD_FANOUT_LIMIT}"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt
        .query_map(params![source_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Fetch a single neuron by id, if it still exists.
fn fetch_neuron(conn: &Connection, id: &str) -> Result<Option<Neuron>> {
    let sql = format!("SELECT {NEURON_COLUMNS} FROM neurons WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    let neuron = stmt.query_row(params![id], Neuron::from_row).optional()?;
    Ok(neuron)
}

/// Phase-3 candidates: top-myelination neurons of the requested type,
/// excluding everything already activated.
fn myelinated_candidates(
    conn: &Connection,
    neuron_type: NeuronType,
    activated: &HashSet<String>,
    limit: usize,
) -> Result<Vec<Neuron>> {
    // Dynamic NOT IN clause; the activated set is bounded by the recall limit
    // plus the spread fan-out, so the placeholder count stays small.
    let placeholders: Vec<String> = (2..activated.len() + 2).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT {NEURON_COLUMNS} FROM neurons WHERE type = ?1 {} \
         ORDER BY myelination DESC LIMIT {limit}",
        if placeholders.is_empty() {
            String::new()
        } else {
            format!("AND id NOT IN ({})", placeholders.join(", "))
        }
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut sql_params: Vec<&dyn rusqlite::types::ToSql> = vec![&neuron_type as &dyn rusqlite::types::ToSql];
    let activated_vec: Vec<&String> = activated.iter().collect();
    for id in &activated_vec {
        sql_params.push(*id as &dyn rusqlite::types::ToSql);
    }

    let rows = stmt
        .query_map(sql_params.as_slice(), Neuron::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_neuron(contexts: Vec<&str>, myelination: f64, last_accessed: Option<String>) -> Neuron {
        Neuron {
            id: "file:/src/deploy.rs".to_string(),
            neuron_type: NeuronType::File,
            path: "/src/deploy.rs".to_string(),
            activation: 1.0,
            myelination,
            access_count: 1,
            last_accessed,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            contexts: contexts.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn keywords_drop_short_tokens_and_lowercase() {
        assert_eq!(
            extract_keywords("Fix my deploy at v2"),
            vec!["fix".to_string(), "deploy".to_string()]
        );
        assert!(extract_keywords("a an of it").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn score_full_context_match_passes_gate() {
        let neuron = test_neuron(
            vec!["deploy the service"],
            0.0,
            Some(Utc::now().to_rfc3339()),
        );
        let keywords = extract_keywords("deploy service");
        let score = score_neuron(&neuron, &keywords);
        // 0.4 context + ~0.2 recency + 0.05 path ("deploy" appears in the path)
        assert!(score >= CONFIDENCE_GATE);
        assert!(score <= 1.0);
    }

    #[test]
    fn score_is_zero_for_empty_keyword_set() {
        let neuron = test_neuron(vec!["anything"], 0.0, None);
        assert_eq!(score_neuron(&neuron, &[]), 0.0);
    }

    #[test]
    fn score_recency_decays_over_a_week() {
        let recent = test_neuron(vec![], 0.0, Some(Utc::now().to_rfc3339()));
        let stale = test_neuron(
            vec![],
            0.0,
            Some((Utc::now() - chrono::Duration::days(30)).to_rfc3339()),
        );
        let keywords = extract_keywords("unmatched");

        let recent_score = score_neuron(&recent, &keywords);
        let stale_score = score_neuron(&stale, &keywords);
        assert!(recent_score > 0.19); // ~0.2 recency component
        assert_eq!(stale_score, 0.0); // clamped at zero past the window
    }

    #[test]
    fn score_never_exceeds_one() {
        let neuron = test_neuron(
            vec!["deploy"],
            0.95,
            Some(Utc::now().to_rfc3339()),
        );
        let keywords = extract_keywords("deploy");
        assert!(score_neuron(&neuron, &keywords) <= 1.0);
    }

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
