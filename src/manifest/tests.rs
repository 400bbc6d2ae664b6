//! End-to-end tests for the manifest pipeline.

use super::*;
use crate::common::Error;

const MINIMAL_12: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="com.example.minimal" version="1.0"
    xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
    xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <metadata>
    <schema>ADL SCORM</schema>
    <schemaversion>1.2</schemaversion>
  </metadata>
  <organizations default="org1">
    <organization identifier="org1">
      <title>Minimal Course</title>
      <item identifier="item1" identifierref="res1">
        <title>Only Lesson</title>
      </item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="res1" type="webcontent" adlcp:scormtype="sco" href="index.html">
      <file href="index.html"/>
    </resource>
  </resources>
</manifest>"#;

const FOLDER_2004: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="com.example.golf" version="1"
    xmlns="http://www.imsglobal.org/xsd/imscp_v1p1"
    xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3"
    xmlns:adlseq="http://www.adlnet.org/xsd/adlseq_v1p3"
    xmlns:imsss="http://www.imsglobal.org/xsd/imsss"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.imsglobal.org/xsd/imscp_v1p1 imscp_v1p1.xsd
                        http://www.adlnet.org/xsd/adlcp_v1p3 adlcp_v1p3.xsd
                        http://www.imsglobal.org/xsd/imsss imsss_v1p0.xsd">
  <metadata>
    <schema>ADL SCORM</schema>
    <schemaversion>2004 4th Edition</schemaversion>
    <lom><general>
      <title><string language="en-US">Golf Explained</string></title>
      <description><string language="en-US">Rules and etiquette</string></description>
    </general></lom>
  </metadata>
  <organizations default="golf_org">
    <organization identifier="golf_org" adlseq:objectivesGlobalToSystem="false">
      <title>Golf Explained</title>
      <item identifier="playing" isvisible="true">
        <title>Playing the Game</title>
        <item identifier="rules" identifierref="rules_res">
          <title>Rules</title>
          <adlcp:completionThreshold minProgressMeasure="0.8"/>
        </item>
        <item identifier="scoring" identifierref="scoring_res" parameters="?mode=review">
          <title>Scoring</title>
          <imsss:sequencing>
            <imsss:deliveryControls completionSetByContent="true"/>
          </imsss:sequencing>
        </item>
      </item>
      <imsss:sequencing>
        <imsss:controlMode choice="true" flow="true"/>
      </imsss:sequencing>
    </organization>
  </organizations>
  <resources>
    <resource identifier="rules_res" type="webcontent" adlcp:scormType="sco" href="rules/index.html">
      <file href="rules/index.html"/>
      <dependency identifierref="common_files"/>
    </resource>
    <resource identifier="scoring_res" type="webcontent" adlcp:scormType="sco" href="scoring/index.html">
      <file href="scoring/index.html"/>
      <dependency identifierref="common_files"/>
    </resource>
    <resource identifier="common_files" type="webcontent" adlcp:scormType="asset">
      <file href="shared/style.css"/>
    </resource>
  </resources>
</manifest>"#;

#[test]
fn test_minimal_scorm12_single_sco() {
    let manifest = parse_manifest(MINIMAL_12).unwrap();

    assert_eq!(manifest.standard, Standard::Scorm12);
    assert_eq!(manifest.version, "1.2");
    assert_eq!(manifest.identifier, "com.example.minimal");
    assert_eq!(manifest.title, "Minimal Course");
    assert_eq!(manifest.schema.as_deref(), Some("ADL SCORM"));
    assert_eq!(manifest.default_organization.as_deref(), Some("org1"));

    assert_eq!(manifest.scos.len(), 1);
    let sco = &manifest.scos[0];
    assert_eq!(sco.id, "org1_item1");
    assert_eq!(sco.launch_href, "index.html");
    assert_eq!(sco.seq_order, 1);
    assert!(sco.is_launchable);
    assert_eq!(sco.scorm_type.as_deref(), Some("sco"));

    assert!(manifest.validation.is_valid);
    assert!(manifest.validation.warnings.is_empty());
}

#[test]
fn test_dangling_reference() {
    let xml = MINIMAL_12.replace(r#"identifierref="res1""#, r#"identifierref="res_missing""#);
    let manifest = parse_manifest(&xml).unwrap();

    assert!(manifest.scos.is_empty());
    assert!(!manifest.validation.is_valid);
    assert_eq!(manifest.validation.errors.len(), 1);
    assert!(manifest.validation.errors[0].contains("res_missing"));
    assert!(manifest.validation.errors[0].contains("item1"));
}

#[test]
fn test_multi_sco_2004_with_folder() {
    let manifest = parse_manifest(FOLDER_2004).unwrap();

    assert_eq!(manifest.standard, Standard::Scorm2004);
    assert_eq!(manifest.version, "2004 4th Edition");
    assert_eq!(manifest.title, "Golf Explained");
    assert_eq!(manifest.description.as_deref(), Some("Rules and etiquette"));

    let summary: Vec<_> = manifest
        .scos
        .iter()
        .map(|s| (s.identifier.as_str(), s.seq_order))
        .collect();
    assert_eq!(summary, vec![("rules", 1), ("scoring", 2)]);
    assert!(manifest.scos.iter().all(|s| s.is_launchable));
    assert!(manifest.scos.iter().all(|s| s.identifier != "playing"));

    let scoring = &manifest.scos[1];
    assert_eq!(scoring.launch_url(), "scoring/index.html?mode=review");
    assert!(scoring.sequencing.is_some());

    let org = manifest.primary_organization().unwrap();
    assert!(org.sequencing.is_some());
    assert_eq!(org.items[0].children[0].completion_threshold, Some(0.8));

    let common = manifest.resource("common_files").unwrap();
    assert_eq!(common.files, vec!["shared/style.css"]);
    assert_eq!(manifest.resource("rules_res").unwrap().dependencies, vec!["common_files"]);
    assert!(manifest.validation.is_valid);
}

#[test]
fn test_asset_never_launchable_in_2004() {
    let xml = FOLDER_2004.replace(
        r#"identifier="scoring_res" type="webcontent" adlcp:scormType="sco""#,
        r#"identifier="scoring_res" type="webcontent" adlcp:scormType="asset""#,
    );
    let manifest = parse_manifest(&xml).unwrap();
    let scoring = manifest.scos.iter().find(|s| s.identifier == "scoring").unwrap();
    assert!(!scoring.is_launchable);
    assert_eq!(manifest.launchable_scos().count(), 1);

    let strict = ScormManifestParser::with_options(ParseOptions::new().with_non_launchable(false))
        .parse_manifest(&xml)
        .unwrap();
    assert_eq!(strict.scos.len(), 1);
    assert_eq!(strict.scos[0].identifier, "rules");
}

#[test]
fn test_plain_webcontent_launchable_in_12() {
    let xml = MINIMAL_12.replace(r#" adlcp:scormtype="sco""#, "");
    let manifest = parse_manifest(&xml).unwrap();
    assert_eq!(manifest.standard, Standard::Scorm12);
    assert_eq!(manifest.scos[0].scorm_type, None);
    assert!(manifest.scos[0].is_launchable);
}

#[test]
fn test_missing_organizations_block() {
    let xml = r#"<manifest identifier="m">
        <resources><resource identifier="r" href="index.html"/></resources>
    </manifest>"#;
    let manifest = parse_manifest(xml).unwrap();

    assert!(manifest.organizations.is_empty());
    assert!(manifest.scos.is_empty());
    assert_eq!(manifest.default_organization, None);
    assert!(!manifest.validation.is_valid);
    assert!(
        manifest
            .validation
            .errors
            .iter()
            .any(|e| e.contains("organizations"))
    );
}

#[test]
fn test_fatal_inputs() {
    assert!(matches!(parse_manifest("<manifest"), Err(Error::Xml(_))));
    assert!(matches!(parse_manifest(""), Err(Error::Xml(_))));
    assert_eq!(
        parse_manifest("<package identifier=\"x\"/>").unwrap_err(),
        Error::MissingManifest
    );
}

#[test]
fn test_namespaced_root_and_defaults() {
    let manifest = parse_manifest(
        r#"<imscp:manifest xmlns:imscp="http://www.imsglobal.org/xsd/imscp_v1p1">
            <imscp:organizations>
                <imscp:organization><imscp:item identifierref="r"/></imscp:organization>
            </imscp:organizations>
            <imscp:resources><imscp:resource identifier="r" href="a.html"/></imscp:resources>
        </imscp:manifest>"#,
    )
    .unwrap();

    assert_eq!(manifest.identifier, "unknown");
    assert_eq!(manifest.title, "Untitled SCORM Package");
    assert_eq!(manifest.default_organization.as_deref(), Some("org_0"));
    assert_eq!(manifest.scos[0].id, "org_0_item_0_0");
    assert_eq!(
        manifest.validation.errors,
        vec!["Manifest missing required identifier attribute"]
    );
}

#[test]
fn test_identifier_collision_across_organizations() {
    let manifest = parse_manifest(
        r#"<manifest identifier="m"><organizations>
            <organization identifier="full"><item identifier="intro" identifierref="r"/></organization>
            <organization identifier="short"><item identifier="intro" identifierref="r"/></organization>
        </organizations><resources><resource identifier="r" href="a.html"/></resources></manifest>"#,
    )
    .unwrap();

    let ids: Vec<_> = manifest.scos.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["full_intro", "short_intro"]);
    assert_eq!(manifest.scos_for("short").count(), 1);
    assert_eq!(manifest.scos[1].seq_order, 2);
}

#[test]
fn test_primary_organization_follows_default() {
    let xml = r#"<manifest identifier="m"><organizations default="short">
            <organization identifier="full"><item identifier="a" identifierref="r"/></organization>
            <organization identifier="short"><item identifier="b" identifierref="r"/></organization>
        </organizations><resources><resource identifier="r" href="a.html"/></resources></manifest>"#;
    let manifest = parse_manifest(xml).unwrap();
    assert_eq!(manifest.default_organization.as_deref(), Some("short"));
    assert_eq!(manifest.primary_organization().map(|o| o.identifier.as_str()), Some("short"));

    let without_default = parse_manifest(&xml.replace(r#" default="short""#, "")).unwrap();
    assert_eq!(without_default.primary_organization().map(|o| o.identifier.as_str()), Some("full"));
}

#[test]
fn test_publish_policy_gate() {
    let broken = MINIMAL_12.replace(r#"identifierref="res1""#, r#"identifierref="nope""#);

    let blocking = ScormManifestParser::new();
    match blocking.parse_for_publish(&broken) {
        Err(Error::Unpublishable { errors }) => assert_eq!(errors.len(), 1),
        other => panic!("expected Unpublishable, got {:?}", other),
    }

    let lenient = ScormManifestParser::with_options(ParseOptions::new().with_publish_policy(PublishPolicy::Warn));
    assert!(lenient.parse_for_publish(&broken).is_ok());
    assert!(blocking.parse_for_publish(MINIMAL_12).is_ok());
}

#[test]
fn test_scos_derivable_and_parse_idempotent() {
    for xml in [MINIMAL_12, FOLDER_2004] {
        let first = parse_manifest(xml).unwrap();
        let second = parse_manifest(xml).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.rebuild_scos(&ParseOptions::default()), first.scos);
    }
}

/// One organization whose items nest `depth` levels, every item launching
/// `res1`; the innermost item points at a missing resource instead.
fn deeply_nested(depth: usize) -> String {
    let mut xml = String::from(
        r#"<manifest identifier="deep"><organizations><organization identifier="org1">"#,
    );
    for level in 0..depth {
        let reference = if level + 1 == depth { "gone" } else { "res1" };
        xml.push_str(&format!(r#"<item identifier="i{}" identifierref="{}">"#, level, reference));
    }
    xml.push_str(&"</item>".repeat(depth));
    xml.push_str(
        r#"</organization></organizations><resources><resource identifier="res1" type="webcontent" href="index.html"/></resources></manifest>"#,
    );
    xml
}

#[test]
fn test_deep_nesting_truncated_and_fully_validated() {
    let manifest = parse_manifest(&deeply_nested(5_000)).unwrap();

    assert_eq!(manifest.scos.len(), 64);
    assert_eq!(manifest.scos.last().map(|s| s.identifier.as_str()), Some("i63"));
    assert_eq!(
        manifest.validation.warnings,
        vec!["Item 'i63' nests deeper than 64 levels; its descendants were ignored"]
    );
    // validation still sees the raw tree below the cut-off
    assert_eq!(
        manifest.validation.errors,
        vec!["Item 'i4999' references unknown resource 'gone'"]
    );
    assert_eq!(manifest.rebuild_scos(&ParseOptions::default()), manifest.scos);
}

#[test]
fn test_custom_depth_limit_end_to_end() {
    let parser = ScormManifestParser::with_options(ParseOptions::new().with_max_item_depth(3));
    let manifest = parser.parse_manifest(&deeply_nested(10)).unwrap();

    let ids: Vec<_> = manifest.scos.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(ids, vec!["i0", "i1", "i2"]);
    assert_eq!(manifest.validation.warnings.len(), 1);
    assert!(manifest.validation.warnings[0].contains("'i2'"));
    assert_eq!(manifest.rebuild_scos(parser.options()), manifest.scos);
}

#[test]
fn test_unescaped_ampersand_in_title() {
    let xml = MINIMAL_12.replace("<title>Only Lesson</title>", "<title>Q & A</title>");
    let manifest = parse_manifest(&xml).unwrap();
    assert_eq!(manifest.scos[0].title, "Q & A");
    assert!(manifest.validation.is_valid);
}

#[test]
fn test_serialized_shape() {
    let manifest = parse_manifest(FOLDER_2004).unwrap();
    let value = serde_json::to_value(&manifest).unwrap();
    assert_eq!(value["standard"], "SCORM 2004");
    assert_eq!(value["resources"][0]["type"], "webcontent");
    assert_eq!(value["scos"][0]["seq_order"], 1);
    assert_eq!(value["validation"]["is_valid"], true);
}

#[test]
fn test_concurrent_parsing() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ParsedManifest>();
    assert_send_sync::<ScormManifestParser>();

    let parser = ScormManifestParser::new();
    let expected = parser.parse_manifest(FOLDER_2004).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| parser.parse_manifest(FOLDER_2004).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::fmt::Write;

    /// Generated item: `reference` 0..=2 names a resource, 3 dangles.
    #[derive(Debug, Clone)]
    struct GenItem {
        reference: Option<u8>,
        children: Vec<GenItem>,
    }

    fn item_strategy() -> impl Strategy<Value = GenItem> {
        let leaf = prop::option::of(0u8..4).prop_map(|reference| GenItem {
            reference,
            children: Vec::new(),
        });
        leaf.prop_recursive(4, 32, 4, |inner| {
            (prop::option::of(0u8..4), prop::collection::vec(inner, 0..4))
                .prop_map(|(reference, children)| GenItem { reference, children })
        })
    }

    fn organizations_strategy() -> impl Strategy<Value = Vec<Vec<GenItem>>> {
        prop::collection::vec(prop::collection::vec(item_strategy(), 0..4), 1..4)
    }

    /// Expected SCO ids and the number of dangling references.
    struct Expected {
        sco_ids: Vec<String>,
        dangling: usize,
    }

    fn render_item(org: usize, item: &GenItem, counter: &mut usize, xml: &mut String, expected: &mut Expected) {
        let id = *counter;
        *counter += 1;
        write!(xml, r#"<item identifier="i{}""#, id).unwrap();
        match item.reference {
            Some(3) => {
                xml.push_str(r#" identifierref="missing""#);
                expected.dangling += 1;
            },
            Some(r) => {
                write!(xml, r#" identifierref="r{}""#, r).unwrap();
                expected.sco_ids.push(format!("org{}_i{}", org, id));
            },
            None => {},
        }
        write!(xml, "><title>Item {}</title>", id).unwrap();
        for child in &item.children {
            render_item(org, child, counter, xml, expected);
        }
        xml.push_str("</item>");
    }

    fn render(orgs: &[Vec<GenItem>]) -> (String, Expected) {
        let mut expected = Expected {
            sco_ids: Vec::new(),
            dangling: 0,
        };
        let mut counter = 0;
        let mut xml = String::from(r#"<manifest identifier="generated"><organizations>"#);
        for (o, items) in orgs.iter().enumerate() {
            write!(xml, r#"<organization identifier="org{}">"#, o).unwrap();
            for item in items {
                render_item(o, item, &mut counter, &mut xml, &mut expected);
            }
            xml.push_str("</organization>");
        }
        xml.push_str("</organizations><resources>");
        for r in 0..3 {
            write!(
                xml,
                r#"<resource identifier="r{}" type="webcontent" href="r{}.html"/>"#,
                r, r
            )
            .unwrap();
        }
        xml.push_str("</resources></manifest>");
        (xml, expected)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_seq_order_is_total_and_document_ordered(orgs in organizations_strategy()) {
            let (xml, expected) = render(&orgs);
            let manifest = parse_manifest(&xml).unwrap();

            let orders: Vec<u32> = manifest.scos.iter().map(|s| s.seq_order).collect();
            let want: Vec<u32> = (1..=expected.sco_ids.len() as u32).collect();
            prop_assert_eq!(orders, want);

            let ids: Vec<&str> = manifest.scos.iter().map(|s| s.id.as_str()).collect();
            prop_assert_eq!(ids, expected.sco_ids.iter().map(String::as_str).collect::<Vec<_>>());
        }

        #[test]
        fn prop_each_dangling_reference_is_one_error(orgs in organizations_strategy()) {
            let (xml, expected) = render(&orgs);
            let manifest = parse_manifest(&xml).unwrap();

            let dangling_errors = manifest
                .validation
                .errors
                .iter()
                .filter(|e| e.contains("references unknown resource 'missing'"))
                .count();
            prop_assert_eq!(dangling_errors, expected.dangling);
            prop_assert_eq!(manifest.validation.is_valid, expected.dangling == 0);
            prop_assert!(manifest.scos.iter().all(|s| s.launch_href != ""));
        }

        #[test]
        fn prop_scos_derivable_and_idempotent(orgs in organizations_strategy()) {
            let (xml, _) = render(&orgs);
            let first = parse_manifest(&xml).unwrap();
            let second = parse_manifest(&xml).unwrap();

            prop_assert_eq!(first.rebuild_scos(&ParseOptions::default()), first.scos.clone());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_sequencing_namespace_always_detected(position in 0usize..3) {
            let decl = r#"xmlns:imsss="http://www.imsglobal.org/xsd/imsss""#;
            let at = |p: usize| if p == position { decl } else { "" };
            let xml = format!(
                r#"<manifest identifier="m" {}><organizations><organization identifier="o">
                    <item identifier="i" identifierref="r" {}/>
                </organization></organizations>
                <resources><resource identifier="r" href="a.html" {}/></resources></manifest>"#,
                at(0), at(1), at(2)
            );
            let manifest = parse_manifest(&xml).unwrap();
            prop_assert_eq!(manifest.standard, Standard::Scorm2004);
        }
    }
}
