//! Session-local category mapping.
//!
//! Assignment only mutates the `category` field of one transaction and never
//! touches the backend; definitions of new names are recorded on the session
//! and pushed to the backend by the coordinator.

use crate::session::ImportSession;

/// Assign a category label to one transaction by sequence id.
///
/// Returns false when no transaction carries that id. Assignments are
/// independent per id, so applying them in any order gives the same session.
pub fn assign(session: &mut ImportSession, sequence_id: u32, label: &str) -> bool {
    match session.find_mut(sequence_id) {
        Some(txn) => {
            txn.category = label.to_string();
            true
        }
        None => false,
    }
}

/// Record an operator-defined category on the session. Returns false if the
/// name was already present.
pub fn define_local(session: &mut ImportSession, name: &str) -> bool {
    if session.local_categories.iter().any(|c| c == name) {
        return false;
    }
    session.local_categories.push(name.to_string());
    true
}

/// Candidate list offered to the operator: backend registry first, then the
/// session's ad-hoc names not already in the registry.
pub fn candidates(registry: &[String], session: &ImportSession) -> Vec<String> {
    let mut out = registry.to_vec();
    for name in &session.local_categories {
        if !out.iter().any(|c| c == name) {
            out.push(name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerly_ingest::{ParsedTransaction, StatementDialect};

    fn session() -> ImportSession {
        let txns = (1..=3)
            .map(|i| ParsedTransaction::from_signed(i, "2025-10-15", "t", -1.0))
            .collect();
        ImportSession::new("extrato.csv", StatementDialect::DelimitedText, txns)
    }

    #[test]
    fn test_assign_sets_category() {
        let mut s = session();
        assert!(assign(&mut s, 2, "Mercado"));
        assert_eq!(s.find_mut(2).unwrap().category, "Mercado");
        assert_eq!(s.uncategorized_count(), 2);
    }

    #[test]
    fn test_assign_unknown_id_is_rejected() {
        let mut s = session();
        assert!(!assign(&mut s, 99, "Mercado"));
        assert_eq!(s.uncategorized_count(), 3);
    }

    #[test]
    fn test_assign_is_commutative() {
        let mut a = session();
        assign(&mut a, 1, "Mercado");
        assign(&mut a, 2, "Transporte");

        let mut b = session();
        assign(&mut b, 2, "Transporte");
        assign(&mut b, 1, "Mercado");

        assert_eq!(a, b);
    }

    #[test]
    fn test_reassignment_overwrites() {
        let mut s = session();
        assign(&mut s, 1, "Mercado");
        assign(&mut s, 1, "Lazer");
        assert_eq!(s.find_mut(1).unwrap().category, "Lazer");
    }

    #[test]
    fn test_define_local_deduplicates() {
        let mut s = session();
        assert!(define_local(&mut s, "Pets"));
        assert!(!define_local(&mut s, "Pets"));
        assert_eq!(s.local_categories, ["Pets"]);
    }

    #[test]
    fn test_candidates_are_registry_union_session() {
        let mut s = session();
        define_local(&mut s, "Pets");
        define_local(&mut s, "Mercado");
        let registry = vec!["Mercado".to_string(), "Transporte".to_string()];
        let got = candidates(&registry, &s);
        assert_eq!(got, ["Mercado", "Transporte", "Pets"]);
    }
}
