//! Referential soft-delete guard.
//!
//! Instead of walking reverse relations at runtime, the dependents of
//! each guarded entity are declared in a static table and probed by
//! direct lookup. The guard is a precondition check, not a cascade: it
//! refuses the delete while any live dependent still references the
//! record.

/// Entities that participate in the soft-delete scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    Site,
}

/// One reverse relation of a guarded entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependentRelation {
    /// Human-readable name used in the refusal message.
    pub entity: &'static str,
    pub table: &'static str,
    pub fk_column: &'static str,
    /// Only relations whose dependent also carries a deleted flag are
    /// probed; the rest are listed for completeness.
    pub soft_delete_aware: bool,
}

/// Reverse relations per guarded entity, declared statically.
pub fn dependents_of(kind: EntityKind) -> &'static [DependentRelation] {
    match kind {
        EntityKind::Company => &[DependentRelation {
            entity: "Site",
            table: "sites",
            fk_column: "company_id",
            soft_delete_aware: true,
        }],
        EntityKind::Site => &[
            DependentRelation {
                entity: "Client",
                table: "clients",
                fk_column: "site_id",
                soft_delete_aware: true,
            },
            DependentRelation {
                entity: "MonthlyTarget",
                table: "monthly_targets",
                fk_column: "site_id",
                soft_delete_aware: false,
            },
        ],
    }
}

/// EXISTS probe for live dependents through one relation. Table and
/// column names come from the static table above, never from input.
pub fn probe_sql(rel: &DependentRelation) -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND deleted = FALSE)",
        rel.table, rel.fk_column
    )
}

/// Runs the probe over every soft-delete-aware relation of `kind` and
/// returns the first relation that still has a live dependent.
pub fn first_blocking_dependent<E>(
    kind: EntityKind,
    mut has_live_dependent: impl FnMut(&DependentRelation) -> Result<bool, E>,
) -> Result<Option<&'static DependentRelation>, E> {
    for rel in dependents_of(kind) {
        if !rel.soft_delete_aware {
            continue;
        }
        if has_live_dependent(rel)? {
            return Ok(Some(rel));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_aware_relations_are_skipped() {
        let mut probed = Vec::new();
        let result = first_blocking_dependent::<()>(EntityKind::Site, |rel| {
            probed.push(rel.table);
            Ok(false)
        })
        .unwrap();
        assert!(result.is_none());
        assert_eq!(probed, vec!["clients"]);
    }
}
