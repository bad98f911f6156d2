mod common;

use apidoc_ts::ast::class::{ClassDecl, ClassMember};
use apidoc_ts::ast::expr::{Expr, PropKey};
use apidoc_ts::ast::node::Node;
use apidoc_ts::ast::type_expr::KeywordType;
use apidoc_ts::rewrite_model_classes;
use apidoc_ts::types::Decl;
use apidoc_ts::{PluginOptions, ProgramTypes};
use common::*;

const HOST: &str = "src/user/create-user.dto.ts";

fn program() -> ProgramTypes {
  let mut types = ProgramTypes::new();
  types
    .declare("src/user/user.entity.ts", "User", Decl::Class)
    .declare("src/user/role.enum.ts", "Role", Decl::Enum {
      members: vec!["Admin".to_string(), "Member".to_string()],
    })
    .declare(
      "node_modules/mongoose/types/index.d.ts",
      "Document",
      Decl::Class,
    )
    .import(HOST, "User", "src/user/user.entity.ts", "User")
    .import(HOST, "Role", "src/user/role.enum.ts", "Role")
    .import(
      HOST,
      "Document",
      "node_modules/mongoose/types/index.d.ts",
      "Document",
    );
  types
}

fn rewrite_with(members: Vec<Node<ClassMember>>, options: &PluginOptions) -> String {
  let types = program();
  let source = unit(HOST, vec![class("CreateUserDto", members)]);
  let rewritten = rewrite_model_classes(&source, &types, options);
  factory_text(find_class(&rewritten, "CreateUserDto"))
}

fn rewrite(members: Vec<Node<ClassMember>>) -> String {
  rewrite_with(members, &PluginOptions::default())
}

#[test]
fn plain_fields_get_required_type_and_default() {
  let text = rewrite(vec![
    prop("email", Some(kw(KeywordType::String))).build(),
    prop("age", Some(kw(KeywordType::Number)))
      .optional()
      .init(num(18.0))
      .build(),
  ]);
  assert_eq!(
    text,
    "{ email: { required: true, type: () => String }, age: { required: false, type: () => Number, default: 18 } }"
  );
}

#[test]
fn ineligible_fields_are_excluded() {
  let text = rewrite(vec![
    prop("count", Some(kw(KeywordType::Number))).static_().build(),
    prop("secret", Some(kw(KeywordType::String)))
      .deco(deco("ApiHideProperty", Vec::new()))
      .build(),
    prop("computed", Some(kw(KeywordType::String)))
      .key(PropKey::Computed(id("KEY")))
      .build(),
    prop("token", Some(kw(KeywordType::String)))
      .key(PropKey::Private("token".to_string()))
      .build(),
    prop("name", Some(kw(KeywordType::String))).build(),
  ]);
  assert_eq!(text, "{ name: { required: true, type: () => String } }");
}

#[test]
fn original_members_are_kept_in_order() {
  let types = program();
  let members = vec![
    prop("b", Some(kw(KeywordType::String))).build(),
    method("describe", Vec::new(), None, None),
    prop("a", Some(kw(KeywordType::Boolean))).static_().build(),
  ];
  let source = unit(HOST, vec![class("CreateUserDto", members.clone())]);
  let rewritten = rewrite_model_classes(&source, &types, &PluginOptions::default());
  let class: &ClassDecl = find_class(&rewritten, "CreateUserDto");
  assert_eq!(class.members.len(), members.len() + 1);
  assert_eq!(&class.members[..members.len()], members.as_slice());
  // The input unit is never touched.
  assert_eq!(find_class(&source, "CreateUserDto").members.len(), members.len());
}

#[test]
fn inline_structural_type_nests_a_provider() {
  let text = rewrite(vec![prop(
    "address",
    Some(tobject(vec![
      ("a", false, kw(KeywordType::String)),
      ("b", true, kw(KeywordType::Number)),
    ])),
  )
  .build()]);
  assert_eq!(
    text,
    "{ address: { required: true, type: () => ({ a: { required: true, type: () => String }, b: { required: false, type: () => Number } }) } }"
  );
}

#[test]
fn nullable_union_behaves_like_its_constituent() {
  let text = rewrite(vec![prop(
    "nickname",
    Some(tunion(vec![kw(KeywordType::String), kw(KeywordType::Null)])),
  )
  .build()]);
  assert_eq!(
    text,
    "{ nickname: { required: true, type: () => String, nullable: true } }"
  );
}

#[test]
fn ambiguous_union_emits_no_type() {
  let text = rewrite(vec![prop(
    "id",
    Some(tunion(vec![kw(KeywordType::String), kw(KeywordType::Number)])),
  )
  .build()]);
  assert_eq!(text, "{ id: { required: true } }");
}

#[test]
fn nullable_array_keeps_array_type() {
  let text = rewrite(vec![prop(
    "tags",
    Some(tunion(vec![
      tarray(kw(KeywordType::String)),
      kw(KeywordType::Null),
    ])),
  )
  .build()]);
  assert_eq!(
    text,
    "{ tags: { required: true, type: () => [String], nullable: true } }"
  );
}

#[test]
fn nullable_enum_array_sets_enum_is_array_and_nullable() {
  let text = rewrite(vec![prop(
    "roles",
    Some(tunion(vec![tarray(tref("Role")), kw(KeywordType::Null)])),
  )
  .build()]);
  assert_eq!(
    text,
    "{ roles: { required: true, nullable: true, enum: require(\"./role.enum\").Role, isArray: true } }"
  );
}

#[test]
fn enum_fields() {
  let text = rewrite(vec![
    prop("role", Some(tref("Role"))).build(),
    prop("admin", Some(tref("Role.Admin"))).build(),
  ]);
  assert_eq!(
    text,
    "{ role: { required: true, enum: require(\"./role.enum\").Role }, admin: { required: true, enum: require(\"./role.enum\").Role } }"
  );
}

#[test]
fn enum_union_with_other_types_is_not_an_enum() {
  let text = rewrite(vec![
    prop("a", Some(tunion(vec![kw(KeywordType::String), tref("Role")]))).build(),
    prop("b", Some(tunion(vec![tref("Role"), kw(KeywordType::String)]))).build(),
  ]);
  assert_eq!(text, "{ a: { required: true }, b: { required: true } }");
}

#[test]
fn optional_and_member_union_enums() {
  let text = rewrite(vec![
    prop("role", Some(tref("Role"))).optional().build(),
    prop(
      "level",
      Some(tunion(vec![tref("Role.Admin"), tref("Role.Member")])),
    )
    .build(),
  ]);
  assert_eq!(
    text,
    "{ role: { required: false, enum: require(\"./role.enum\").Role }, level: { required: true, enum: require(\"./role.enum\").Role } }"
  );
}

#[test]
fn class_and_vendor_references() {
  let text = rewrite(vec![
    prop("owner", Some(tref("User"))).build(),
    prop("friends", Some(tarray(tref("User")))).build(),
    prop("doc", Some(tref("Document"))).build(),
    prop("createdAt", Some(tref("Date"))).build(),
  ]);
  assert_eq!(
    text,
    "{ owner: { required: true, type: () => require(\"./user.entity\").User }, friends: { required: true, type: () => [require(\"./user.entity\").User] }, doc: { required: true }, createdAt: { required: true, type: () => Date } }"
  );
}

#[test]
fn default_unwraps_one_assertion_and_uses_inferred_type() {
  let mut types = program();
  types.infer(HOST, "CreateUserDto", "limit", kw(KeywordType::Number));
  let limit = prop("limit", None)
    .init(cast(num(10.0), kw(KeywordType::Number)))
    .build();
  let source = unit(HOST, vec![class("CreateUserDto", vec![limit])]);
  let rewritten = rewrite_model_classes(&source, &types, &PluginOptions::default());
  assert_eq!(
    factory_text(find_class(&rewritten, "CreateUserDto")),
    "{ limit: { required: true, type: () => Number, default: 10 } }"
  );
}

#[test]
fn validation_shim_mirrors_bounds() {
  let rating = || {
    prop("rating", Some(kw(KeywordType::Number)))
      .deco(deco("Min", vec![num(0.0)]))
      .deco(deco("Max", vec![num(10.0)]))
      .deco(deco("IsInt", Vec::new()))
      .build()
  };
  let name = || {
    prop("name", Some(kw(KeywordType::String)))
      .deco(deco("MinLength", vec![num(2.0)]))
      .deco(deco("MaxLength", vec![num(64.0)]))
      .build()
  };
  assert_eq!(
    rewrite(vec![rating(), name()]),
    "{ rating: { required: true, type: () => Number, minimum: 0, maximum: 10 }, name: { required: true, type: () => String, minLength: 2, maxLength: 64 } }"
  );

  let options = PluginOptions {
    class_validator_shim: false,
    ..PluginOptions::default()
  };
  assert_eq!(
    rewrite_with(vec![rating()], &options),
    "{ rating: { required: true, type: () => Number } }"
  );
}

#[test]
fn handwritten_properties_always_win() {
  let handwritten = object(vec![
    ("type", Node::<Expr>::thunk(loc(), id("Object"))),
    ("required", Node::<Expr>::boolean(loc(), false)),
    ("minimum", num(1.0)),
  ]);
  let text = rewrite(vec![prop("createdAt", Some(tref("Date")))
    .deco(deco("ApiProperty", vec![handwritten]))
    .deco(deco("Min", vec![num(5.0)]))
    .build()]);
  assert_eq!(
    text,
    "{ createdAt: { type: () => Object, required: false, minimum: 1 } }"
  );

  let optional = rewrite(vec![prop("nickname", Some(kw(KeywordType::String)))
    .deco(deco("ApiPropertyOptional", vec![object(vec![(
      "description",
      string("Shown publicly"),
    )])]))
    .build()]);
  assert_eq!(
    optional,
    "{ nickname: { description: \"Shown publicly\", required: true, type: () => String } }"
  );
}

#[test]
fn uninspectable_field_is_left_out() {
  let text = rewrite(vec![
    prop("broken", Some(kw(KeywordType::String)))
      .deco(deco("ApiProperty", vec![id("sharedOptions")]))
      .build(),
    prop("fine", Some(kw(KeywordType::String))).build(),
  ]);
  assert_eq!(text, "{ fine: { required: true, type: () => String } }");
}

#[test]
fn comments_become_descriptions_and_examples() {
  let options = PluginOptions {
    introspect_comments: true,
    ..PluginOptions::default()
  };
  let text = rewrite_with(
    vec![
      prop("email", Some(kw(KeywordType::String)))
        .doc("/**\n * Login address.\n * @example \"a@b.co\"\n */")
        .build(),
      prop("scores", Some(tarray(kw(KeywordType::Number))))
        .doc("/**\n * Recent scores.\n * @example [1, [2, 3]]\n * @example []\n */")
        .build(),
      prop("pin", Some(kw(KeywordType::String)))
        .doc("/** @example 1234 */")
        .build(),
    ],
    &options,
  );
  assert_eq!(
    text,
    "{ email: { required: true, type: () => String, description: \"Login address.\", example: \"a@b.co\" }, scores: { required: true, type: () => [Number], description: \"Recent scores.\", examples: [[1, [2, 3]], []] }, pin: { required: true, type: () => String, example: \"1234\" } }"
  );

  let without = rewrite(vec![prop("email", Some(kw(KeywordType::String)))
    .doc("/** Login address. */")
    .build()]);
  assert_eq!(without, "{ email: { required: true, type: () => String } }");
}

#[test]
fn custom_description_key() {
  let options = PluginOptions {
    introspect_comments: true,
    dto_key_of_comment: "title".to_string(),
    ..PluginOptions::default()
  };
  let text = rewrite_with(
    vec![prop("email", Some(kw(KeywordType::String)))
      .doc("// Login address")
      .build()],
    &options,
  );
  assert_eq!(
    text,
    "{ email: { required: true, type: () => String, title: \"Login address\" } }"
  );
}

#[test]
fn every_class_gets_its_own_factory() {
  let types = program();
  let source = unit(HOST, vec![
    class("Empty", Vec::new()),
    class("Named", vec![prop("x", Some(kw(KeywordType::Boolean))).build()]),
  ]);
  let rewritten = rewrite_model_classes(&source, &types, &PluginOptions::default());
  assert_eq!(factory_text(find_class(&rewritten, "Empty")), "{}");
  assert_eq!(
    factory_text(find_class(&rewritten, "Named")),
    "{ x: { required: true, type: () => Boolean } }"
  );
}
