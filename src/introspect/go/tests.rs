//! Go introspection tests

use super::*;
use descgen_generator::TypeKind;
use descgen_synth::{CommentBlock, CommentKind, StorageKind};

fn parse(source: &str) -> Introspection {
    GoIntrospector::default()
        .introspect_source(source, Path::new("models.go"))
        .unwrap()
}

const PET: &str = r#"// Package models holds the store types.
package models

import "time"

// +kubebuilder:object:root=true

// Pet is an animal for sale.
// It may already have an owner.
type Pet struct {
	// Name shown in the catalogue
	Name string `json:"petName,omitempty"`

	Age int `json:"age"` // in years

	// +optional
	// Tags attached by staff
	Tags []string `json:"tags,omitempty"`

	// Owner of the pet, if sold
	Owner *Owner `json:"owner,omitempty"`

	// internal bookkeeping

	// Stock keeping unit
	SKU string `json:"-"`

	Created, Updated time.Time
}

// IsAdult reports whether the pet is grown up.
func (p *Pet) IsAdult() bool {
	return p.Age > 2
}

// Rename changes the pet's name.
func (p *Pet) Rename(name string) {
	p.Name = name
}

// Owner buys pets.
type Owner struct {
	Contact `json:",inline"`

	// Pets the owner has bought
	Pets []Pet `json:"pets"`
}
"#;

#[test]
fn test_package_and_declarations() {
    let introspection = parse(PET);

    assert_eq!(introspection.package.as_deref(), Some("models"));
    let names: Vec<&str> = introspection
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["Pet", "Owner"]);
    assert!(introspection.diagnostics.is_empty());
}

#[test]
fn test_declaration_comments() {
    let introspection = parse(PET);
    let pet = &introspection.declarations[0];

    assert_eq!(
        pet.comments,
        vec![CommentBlock::doc(
            "Pet is an animal for sale.\nIt may already have an owner."
        )]
    );
    assert!(pet.has_attributes);

    let owner = &introspection.declarations[1];
    assert_eq!(owner.comments, vec![CommentBlock::doc("Owner buys pets.")]);
    assert!(!owner.has_attributes);
}

#[test]
fn test_struct_members() {
    let introspection = parse(PET);
    let pet = &introspection.declarations[0];

    let names: Vec<&str> = pet.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Name", "Age", "Tags", "Owner", "SKU", "Created", "Updated", "IsAdult"]
    );

    let name = &pet.members[0];
    assert_eq!(name.comments, vec![CommentBlock::doc("Name shown in the catalogue")]);
    assert_eq!(name.type_name.as_deref(), Some("string"));

    // Trailing comment
    let age = &pet.members[1];
    assert_eq!(age.comments, vec![CommentBlock::plain("in years")]);

    let tags = &pet.members[2];
    assert_eq!(tags.attribute_markers, vec!["+optional"]);
    assert_eq!(tags.comments, vec![CommentBlock::doc("Tags attached by staff")]);

    assert_eq!(pet.members[3].type_name.as_deref(), Some("Owner"));

    // A detached group above the doc comment is kept as a plain comment
    let sku = &pet.members[4];
    assert_eq!(
        sku.comments,
        vec![
            CommentBlock::plain("internal bookkeeping"),
            CommentBlock::doc("Stock keeping unit"),
        ]
    );
    // Never encoded, so never described
    assert_eq!(sku.attribute_markers, vec![r#"json:"-""#]);

    assert_eq!(pet.members[5].type_name.as_deref(), Some("time.Time"));
    assert!(pet.members[6].comments.is_empty());
}

#[test]
fn test_computed_members_from_methods() {
    let introspection = parse(PET);
    let pet = &introspection.declarations[0];

    let is_adult = pet.members.last().unwrap();
    assert_eq!(is_adult.name, "IsAdult");
    assert_eq!(is_adult.storage, StorageKind::Computed);
    assert_eq!(is_adult.comments[0].kind, CommentKind::Doc);
    assert!(pet.members.iter().all(|m| m.name != "Rename"));
}

#[test]
fn test_alias_table_from_tags() {
    let introspection = parse(PET);
    let pet = &introspection.declarations[0];
    let aliases = pet.alias_table.as_ref().unwrap();

    assert_eq!(aliases.get("Name"), Some("petName"));
    assert_eq!(aliases.get("Age"), Some("age"));
    assert_eq!(aliases.get("SKU"), None);
    assert_eq!(aliases.get("Created"), None);

    let owner = &introspection.declarations[1];
    assert_eq!(owner.members[0].name, "Contact");
    assert_eq!(owner.alias_table.as_ref().unwrap().get("Contact"), None);
    assert_eq!(owner.members[1].type_name.as_deref(), Some("Pet"));
}

#[test]
fn test_custom_alias_tag() {
    let source = "package p\n\ntype T struct {\n\tA int `json:\"a\" yaml:\"alpha\"`\n}\n";
    let introspection = GoIntrospector::new("yaml")
        .introspect_source(source, Path::new("t.go"))
        .unwrap();

    assert_eq!(
        introspection.declarations[0]
            .alias_table
            .as_ref()
            .and_then(|t| t.get("A")),
        Some("alpha")
    );
}

#[test]
fn test_struct_without_tags_has_no_alias_table() {
    let introspection = parse("package p\n\ntype T struct {\n\tA int\n}\n");
    assert!(introspection.declarations[0].alias_table.is_none());
}

#[test]
fn test_grouped_type_declaration() {
    let source = r#"package p

// Shared comment for the group
type (
	// Kind of pet
	Kind string

	// Color of fur
	Color struct {
		// Hex value
		Hex string
	}
)
"#;
    let introspection = parse(source);

    let kind = &introspection.declarations[0];
    assert_eq!(kind.name, "Kind");
    assert_eq!(kind.comments, vec![CommentBlock::doc("Kind of pet")]);
    assert!(kind.members.is_empty());

    let color = &introspection.declarations[1];
    assert_eq!(color.comments, vec![CommentBlock::doc("Color of fur")]);
    assert_eq!(color.members[0].comments, vec![CommentBlock::doc("Hex value")]);
}

#[test]
fn test_generic_type_params() {
    let source = r#"package p

// Page of results
type Page[T any, K comparable] struct {
	// Items on this page
	Items []T
}

// Total number of items
func (p Page[T, K]) Total() int {
	return len(p.Items)
}
"#;
    let introspection = parse(source);

    assert_eq!(introspection.type_param_count("Page"), 2);
    let page = &introspection.declarations[0];
    assert_eq!(page.members.len(), 2);
    assert_eq!(page.members[1].name, "Total");
    assert_eq!(page.members[1].storage, StorageKind::Computed);
}

#[test]
fn test_methods_need_single_result() {
    let source = r#"package p

type T struct{}

func (t T) Pair() (int, error) { return 0, nil }

func (t T) Named() (n int) { return 0 }

func (t T) Nothing() {}
"#;
    let introspection = parse(source);
    let names: Vec<&str> = introspection.declarations[0]
        .members
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Named"]);
}

#[test]
fn test_type_kinds() {
    let source = r#"package p

// Reader reads pets.
type Reader interface{ Read() string }

// ID identifies a pet.
type ID = int

// Ref points at a pet.
type Ref *Pet

// Status of an order.
type Status string

// Source is a named reader.
type Source Reader

// Pet is for sale.
type Pet struct{ Name string }
"#;
    let introspection = parse(source);

    assert_eq!(introspection.type_kind("Reader"), TypeKind::Interface);
    assert_eq!(introspection.type_kind("ID"), TypeKind::Alias);
    assert_eq!(introspection.type_kind("Ref"), TypeKind::Pointer);
    assert_eq!(introspection.type_kind("Status"), TypeKind::Defined);
    assert_eq!(introspection.type_kind("Source"), TypeKind::Interface);
    assert_eq!(introspection.type_kind("Pet"), TypeKind::Defined);
    assert!(!introspection.kinds.contains_key("Pet"));
    assert_eq!(introspection.declarations.len(), 6);
}

#[test]
fn test_encoding_skip_respects_alias_tag() {
    let source = "package p

type T struct {
	// a
	A int `json:\"-\" yaml:\"a\"`
	// b
	B int `json:\"-,\"`
}
";

    let json = parse(source);
    let members = &json.declarations[0].members;
    assert_eq!(members[0].attribute_markers, vec![r#"json:"-""#]);
    assert!(members[1].attribute_markers.is_empty());
    assert_eq!(
        json.declarations[0].alias_table.as_ref().and_then(|t| t.get("B")),
        Some("-")
    );

    let yaml = GoIntrospector::new("yaml")
        .introspect_source(source, Path::new("t.go"))
        .unwrap();
    assert!(yaml.declarations[0].members[0].attribute_markers.is_empty());
}

#[test]
fn test_go_directive_is_a_marker() {
    let source = "package p\n\n//go:generate stringer -type=Kind\n// Kind of thing\ntype Kind int\n";
    let introspection = parse(source);
    let kind = &introspection.declarations[0];

    assert!(kind.has_attributes);
    assert_eq!(kind.comments, vec![CommentBlock::doc("Kind of thing")]);
}

#[test]
fn test_syntax_errors_are_reported() {
    let introspection = parse("package p\n\ntype T struct {\n\tA int\n\n");
    assert!(!introspection.diagnostics.is_empty());
}

#[test]
fn test_supports() {
    let introspector = GoIntrospector::default();
    assert!(introspector.supports(Path::new("a/b.go")));
    assert!(!introspector.supports(Path::new("a/b.yaml")));
}
