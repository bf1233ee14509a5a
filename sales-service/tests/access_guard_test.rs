//! Site visibility scoping and soft-delete guard tests.

use sales_service::models::{Profile, Role};
use sales_service::services::access::{site_scope, SiteScope};
use sales_service::services::guard::{
    dependents_of, first_blocking_dependent, probe_sql, EntityKind,
};
use uuid::Uuid;

fn profile(role: Role, site_ids: Vec<Uuid>) -> Profile {
    Profile {
        profile_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        role,
        site_ids,
    }
}

// ----------------------------------------------------------------------------
// Visibility scoping
// ----------------------------------------------------------------------------

#[test]
fn superadmin_sees_everything() {
    let p = profile(Role::Superadmin, vec![]);
    assert_eq!(site_scope(Some(&p)), SiteScope::All);
}

#[test]
fn manager_sees_only_assignments() {
    let sites = vec![Uuid::new_v4(), Uuid::new_v4()];
    let p = profile(Role::Manager, sites.clone());
    assert_eq!(site_scope(Some(&p)), SiteScope::Assigned(sites));
}

#[test]
fn manager_without_assignments_sees_nothing() {
    let p = profile(Role::Manager, vec![]);
    assert_eq!(site_scope(Some(&p)), SiteScope::Assigned(vec![]));
}

#[test]
fn missing_profile_resolves_to_empty_scope() {
    assert_eq!(site_scope(None), SiteScope::Assigned(vec![]));
}

// ----------------------------------------------------------------------------
// Soft-delete guard
// ----------------------------------------------------------------------------

#[test]
fn company_is_guarded_by_its_sites() {
    let rels = dependents_of(EntityKind::Company);
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].table, "sites");
    assert_eq!(rels[0].fk_column, "company_id");
    assert!(rels[0].soft_delete_aware);
}

#[test]
fn site_is_guarded_by_its_clients() {
    let rels = dependents_of(EntityKind::Site);
    let client_rel = rels
        .iter()
        .find(|r| r.table == "clients")
        .expect("clients relation must be declared");
    assert_eq!(client_rel.fk_column, "site_id");
    assert!(client_rel.soft_delete_aware);
}

#[test]
fn probe_only_counts_live_dependents() {
    let rel = &dependents_of(EntityKind::Company)[0];
    assert_eq!(
        probe_sql(rel),
        "SELECT EXISTS(SELECT 1 FROM sites WHERE company_id = $1 AND deleted = FALSE)"
    );
}

#[test]
fn first_live_dependent_blocks_the_delete() {
    let blocking = first_blocking_dependent::<()>(EntityKind::Site, |rel| {
        Ok(rel.table == "clients")
    })
    .unwrap();
    assert_eq!(blocking.map(|r| r.entity), Some("Client"));
}

#[test]
fn no_live_dependents_means_no_block() {
    let blocking = first_blocking_dependent::<()>(EntityKind::Company, |_| Ok(false)).unwrap();
    assert!(blocking.is_none());
}
