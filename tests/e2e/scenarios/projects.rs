use crate::harness::{Assertion, Scenario};
use alias_core::{ResourcePath, Workspace};

#[test]
fn test_relocate_project_onto_link_target() {
    Scenario::new("relocate_onto_link_target")
        .from_fixture("overlap")
        .checking_confluence()
        .create_project("P2")
        .create_file("/P2/child")
        .assert_no_aliases("/P2/child")
        .relocate_project("P2", "file:/tmp/overlap")
        .assert_location("/P2/child", "file:/tmp/overlap/child")
        .assert_aliases(
            "/LinkProject/LinkOverlap1/child",
            &["/LinkProject/LinkOverlap2/child", "/P2/child"],
        )
        .assert_aliases(
            "/P2",
            &["/LinkProject/LinkOverlap1", "/LinkProject/LinkOverlap2"],
        )
        .reset_project_location("P2")
        .assert_location("/P2/child", "file:/ws/P2/child")
        .assert_no_aliases("/P2/child")
        .assert_aliases(
            "/LinkProject/LinkOverlap1/child",
            &["/LinkProject/LinkOverlap2/child"],
        )
        .run()
        .unwrap();
}

#[test]
fn test_closing_project_drops_its_aliases() {
    Scenario::new("close_project")
        .from_fixture("overlap")
        .checking_confluence()
        .close_project("LinkProject")
        .assert_exists("/LinkProject/LinkedFolder")
        .assert_not_claimed("/LinkProject")
        .assert_not_claimed("/LinkProject/LinkedFolder")
        .assert_no_aliases("/Overlap/fOverlap")
        .assert_no_aliases("/LinkProject/LinkedFolder")
        .assert_claim_count(2)
        .open_project("LinkProject")
        .assert_claimed("/LinkProject/LinkedFolder")
        .assert_aliases("/Overlap/fOverlap", &["/LinkProject/LinkedFolder"])
        .assert_aliases("/LinkProject/LinkedFolder", &["/Overlap/fOverlap"])
        .assert_claim_count(7)
        .run()
        .unwrap();
}

#[test]
fn test_closed_project_resources_have_no_aliases() {
    Scenario::new("closed_target_project")
        .from_fixture("overlap")
        .checking_confluence()
        .close_project("Overlap")
        .assert_no_aliases("/Overlap/fOverlap")
        .assert_no_aliases("/LinkProject/LinkedFolder")
        .assert_aliases(
            "/LinkProject/LinkOverlap1/child",
            &["/LinkProject/LinkOverlap2/child"],
        )
        .open_project("Overlap")
        .assert_aliases("/LinkProject/LinkedFolder", &["/Overlap/fOverlap"])
        .run()
        .unwrap();
}

#[test]
fn test_projects_nested_in_another_project() {
    Scenario::new("nested_projects")
        .from_fixture("nested")
        .assert_aliases("/Sub1/a", &["/Top/Sub1/a"])
        .assert_aliases("/Top/Sub1/a", &["/Sub1/a"])
        .assert_aliases("/Top/Sub1", &["/Sub1"])
        .assert_aliases("/Sub1", &["/Top/Sub1"])
        .assert_aliases("/Sub2", &["/Top/Sub2"])
        .assert_aliases("/Top", &["/Sub1", "/Sub2"])
        .assert(Assertion::Custom(Box::new(|ws: &Workspace| {
            let sub1 = ResourcePath::project("Sub1");
            let sub2 = ResourcePath::project("Sub2");
            let aliases = ws.aliases_of(&sub1).unwrap_or_default();
            anyhow::ensure!(!aliases.contains(&sub2), "sibling projects must not alias");
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_delete_project_under_project() {
    Scenario::new("delete_nested_project")
        .from_fixture("nested")
        .checking_confluence()
        .delete_project("Sub1")
        .assert_missing("/Sub1/a")
        .assert_no_aliases("/Top/Sub1/a")
        .assert_aliases("/Top", &["/Sub2"])
        .delete("/Sub2")
        .assert_missing("/Sub2")
        .assert_no_aliases("/Top")
        .assert_claim_count(1)
        .run()
        .unwrap();
}

#[test]
fn test_rename_project_follows_default_location() {
    Scenario::new("rename_project")
        .from_fixture("overlap")
        .checking_confluence()
        .move_resource("/Overlap", "/Renamed")
        .assert_missing("/Overlap")
        .assert_location("/Renamed/fOverlap", "file:/ws/Renamed/fOverlap")
        .assert_no_aliases("/Renamed/fOverlap")
        .assert_no_aliases("/LinkProject/LinkedFolder")
        .relocate_project("Renamed", "file:/ws/Overlap")
        .assert_aliases("/Renamed/fOverlap", &["/LinkProject/LinkedFolder"])
        .assert_aliases("/LinkProject/LinkedFile", &["/Renamed/F2/lOverlap"])
        .run()
        .unwrap();
}

#[test]
fn test_create_project_at_link_location() {
    Scenario::new("project_at_link_location")
        .from_fixture("overlap")
        .checking_confluence()
        .create_project_at("NewP", "file:/tmp/overlap")
        .assert_claimed("/NewP")
        .assert_aliases(
            "/NewP",
            &["/LinkProject/LinkOverlap1", "/LinkProject/LinkOverlap2"],
        )
        .assert_aliases(
            "/LinkProject/LinkOverlap2/child",
            &["/LinkProject/LinkOverlap1/child", "/NewP/child"],
        )
        .delete_project("NewP")
        .assert_aliases(
            "/LinkProject/LinkOverlap2/child",
            &["/LinkProject/LinkOverlap1/child"],
        )
        .run()
        .unwrap();
}

#[test]
fn test_project_created_from_scratch() {
    Scenario::new("from_scratch")
        .create_project("A")
        .create_project("B")
        .create_folder("/A/src")
        .assert_location("/A/src", "file:/workspace/A/src")
        .assert_no_aliases("/A/src")
        .link_folder("/B/src", "file:/workspace/A/src")
        .assert_aliases("/A/src", &["/B/src"])
        .assert_claim_count(3)
        .assert_consistent()
        .run()
        .unwrap();
}
