mod common;

use anyhow::Result;
use common::{ClassFixture, const_decl, entries, function, namespace, param, registry_with};
use php_reflection::core::value::{ArrayKey, Val};
use php_reflection::parser::ast::{ArrayItem, BinaryOp, Expr, MagicConstKind};
use php_reflection::reflection::Subject;
use php_reflection::reflection::namespace::ReflectionFile;
use php_reflection::runtime::context::SourceRegistry;
use php_reflection::{ConstantName, ReflectionError, Resolution, evaluate};
use pretty_assertions::assert_eq;

const SHAPES_FILE: &str = "/src/App/Shapes.php";

fn shapes() -> SourceRegistry {
    let has_sides = ClassFixture::interface("HasSides")
        .constant("SIDES", Expr::int(0))
        .build();

    let shape = ClassFixture::class("Shape")
        .implements("\\App\\HasSides")
        .constant("NAME", Expr::string("shape"))
        .property("sides", Some(Expr::class_const("self", "SIDES")))
        .property("label", None)
        .method(
            "describe",
            vec![param("name", Some(Expr::class_const("parent", "NAME")))],
            vec![],
        )
        .build();

    let label = Expr::binary(
        Expr::binary(
            Expr::class_const("parent", "NAME"),
            BinaryOp::Concat,
            Expr::string(":"),
        ),
        BinaryOp::Concat,
        Expr::class_const("self", "SIDES"),
    );
    let square = ClassFixture::class("Square")
        .extends("\\App\\Shape")
        .constant("SIDES", Expr::int(4))
        .constant("LABEL", label)
        .method(
            "area",
            vec![
                param("size", Some(Expr::class_const("self", "SIDES"))),
                param("name", Some(Expr::class_const("parent", "NAME"))),
                param("class", Some(Expr::class_const("self", "class"))),
                param("parent", Some(Expr::class_const("parent", "class"))),
                param("missing", Some(Expr::class_const("self", "MISSING"))),
            ],
            vec![],
        )
        .build();

    let helper = function(
        "helper",
        vec![
            param(
                "sum",
                Some(Expr::binary(Expr::int(1), BinaryOp::Plus, Expr::constant("LIMIT"))),
            ),
            param("limit", Some(Expr::constant("LIMIT"))),
            param("unknown", Some(Expr::constant("UNKNOWN_THING"))),
            param("eol", Some(Expr::constant("\\PHP_EOL"))),
            param("sep", Some(Expr::constant("DIRECTORY_SEPARATOR"))),
            param("flag", Some(Expr::constant("TRUE"))),
            param("func", Some(Expr::magic(MagicConstKind::Function))),
            param("shape", Some(Expr::class_const("Shape", "NAME"))),
            param("atom", Some(Expr::class_const("\\DateTimeInterface", "ATOM"))),
            param("lost", Some(Expr::class_const("\\App\\Missing", "X"))),
            param("orphan", Some(Expr::class_const("self", "X"))),
            param("plain", None),
        ],
        vec![],
    );

    registry_with(
        SHAPES_FILE,
        vec![namespace(
            "App",
            vec![
                const_decl("LIMIT", Expr::int(10)),
                const_decl(
                    "DOUBLE",
                    Expr::binary(Expr::constant("LIMIT"), BinaryOp::Mul, Expr::int(2)),
                ),
                has_sides,
                shape,
                square,
                helper,
            ],
        )],
    )
}

fn helper_default(registry: &SourceRegistry, name: &str) -> Result<Resolution> {
    let helper = registry.function("App\\helper")?;
    Ok(helper
        .parameter_default(name, registry)?
        .expect("parameter has a default"))
}

fn area_default(registry: &SourceRegistry, name: &str) -> Result<Resolution> {
    let square = registry.class("App\\Square")?;
    let area = square.method("area").expect("area is declared");
    Ok(area
        .parameter_default(name, registry)?
        .expect("parameter has a default"))
}

fn eval_in_file(expr: &Expr) -> Result<Resolution> {
    let registry = SourceRegistry::default();
    let file = ReflectionFile::new("/src/bootstrap.php", vec![String::new()]);
    Ok(evaluate(expr, Subject::File(&file), &registry)?)
}

#[test]
fn test_integer_arithmetic_and_float_promotion() -> Result<()> {
    let expr = Expr::binary(
        Expr::int(7),
        BinaryOp::Plus,
        Expr::binary(Expr::int(3), BinaryOp::Mul, Expr::int(2)),
    );
    assert_eq!(eval_in_file(&expr)?.value, Val::Int(13));

    let exact = Expr::binary(Expr::int(6), BinaryOp::Div, Expr::int(3));
    assert_eq!(eval_in_file(&exact)?.value, Val::Int(2));

    let inexact = Expr::binary(Expr::int(7), BinaryOp::Div, Expr::int(2));
    assert_eq!(eval_in_file(&inexact)?.value, Val::Float(3.5));

    let mixed = Expr::binary(Expr::int(1), BinaryOp::Plus, Expr::float(0.5));
    assert_eq!(eval_in_file(&mixed)?.value, Val::Float(1.5));

    let overflow = Expr::binary(Expr::constant("PHP_INT_MAX"), BinaryOp::Plus, Expr::int(1));
    assert_eq!(
        eval_in_file(&overflow)?.value,
        Val::Float(i64::MAX as f64 + 1.0)
    );

    let power = Expr::binary(Expr::int(2), BinaryOp::Pow, Expr::int(10));
    assert_eq!(eval_in_file(&power)?.value, Val::Int(1024));
    Ok(())
}

#[test]
fn test_array_literal_keys() -> Result<()> {
    let expr = Expr::array(vec![
        ArrayItem::value(Expr::int(10)),
        ArrayItem::value(Expr::int(20)),
        ArrayItem::keyed(Expr::string("x"), Expr::int(30)),
        ArrayItem::value(Expr::int(40)),
    ]);

    let resolution = eval_in_file(&expr)?;
    assert_eq!(
        entries(&resolution.value),
        vec![
            (ArrayKey::Int(0), Val::Int(10)),
            (ArrayKey::Int(1), Val::Int(20)),
            (ArrayKey::str("x"), Val::Int(30)),
            (ArrayKey::Int(2), Val::Int(40)),
        ]
    );
    assert!(!resolution.is_constant());
    Ok(())
}

#[test]
fn test_array_spread_and_numeric_string_keys() -> Result<()> {
    let inner = Expr::array(vec![
        ArrayItem::value(Expr::int(1)),
        ArrayItem::keyed(Expr::string("k"), Expr::int(2)),
    ]);
    let expr = Expr::array(vec![
        ArrayItem::keyed(Expr::string("5"), Expr::string("five")),
        ArrayItem::spread(inner),
        ArrayItem::value(Expr::int(3)),
    ]);

    assert_eq!(
        entries(&eval_in_file(&expr)?.value),
        vec![
            (ArrayKey::Int(5), Val::from("five")),
            (ArrayKey::Int(6), Val::Int(1)),
            (ArrayKey::str("k"), Val::Int(2)),
            (ArrayKey::Int(7), Val::Int(3)),
        ]
    );
    Ok(())
}

#[test]
fn test_resolution_is_idempotent() -> Result<()> {
    let registry = shapes();
    let square = registry.class("App\\Square")?;
    let area = square.method("area").expect("area is declared");
    let expr = Expr::binary(
        Expr::class_const("self", "SIDES"),
        BinaryOp::Mul,
        Expr::constant("LIMIT"),
    );

    let first = evaluate(&expr, Subject::Method(&area), &registry)?;
    let second = evaluate(&expr, Subject::Method(&area), &registry)?;
    assert_eq!(first, second);
    assert_eq!(first.value, Val::Int(40));
    Ok(())
}

#[test]
fn test_untaken_ternary_branch_is_not_evaluated() -> Result<()> {
    let taken = Expr::ternary(
        Expr::constant("true"),
        Some(Expr::int(1)),
        Expr::class_const("parent", "X"),
    );
    assert_eq!(eval_in_file(&taken)?.value, Val::Int(1));

    let other = Expr::ternary(
        Expr::int(0),
        Some(Expr::class_const("self", "X")),
        Expr::string("fallback"),
    );
    assert_eq!(eval_in_file(&other)?.value, Val::from("fallback"));

    let elvis = Expr::ternary(Expr::string("set"), None, Expr::class_const("self", "X"));
    assert_eq!(eval_in_file(&elvis)?.value, Val::from("set"));
    Ok(())
}

#[test]
fn test_constant_name_only_for_whole_expression() -> Result<()> {
    let registry = SourceRegistry::builder()
        .with_core_constants()
        .with_constant("SOME_CONST", 5_i64)
        .build();
    let file = ReflectionFile::new("/src/bootstrap.php", vec![String::new()]);

    let sum = Expr::binary(Expr::int(1), BinaryOp::Plus, Expr::constant("SOME_CONST"));
    let resolution = evaluate(&sum, Subject::File(&file), &registry)?;
    assert_eq!(resolution.value, Val::Int(6));
    assert_eq!(resolution.constant, None);

    let bare = Expr::constant("SOME_CONST");
    let resolution = evaluate(&bare, Subject::File(&file), &registry)?;
    assert_eq!(resolution.value, Val::Int(5));
    assert_eq!(
        resolution.constant,
        Some(ConstantName::Resolved("SOME_CONST".to_owned()))
    );
    Ok(())
}

#[test]
fn test_namespace_and_global_constants() -> Result<()> {
    let registry = shapes();

    let sum = helper_default(&registry, "sum")?;
    assert_eq!(sum.value, Val::Int(11));
    assert!(!sum.is_constant());

    let limit = helper_default(&registry, "limit")?;
    assert_eq!(limit.value, Val::Int(10));
    assert_eq!(limit.constant_name(), Some("App\\LIMIT"));

    let eol = helper_default(&registry, "eol")?;
    assert_eq!(eol.value, Val::from("\n"));
    assert_eq!(eol.constant_name(), Some("PHP_EOL"));

    // Falls back to the global constant when the namespace has none
    let sep = helper_default(&registry, "sep")?;
    assert_eq!(sep.value, Val::from(std::path::MAIN_SEPARATOR_STR));
    assert_eq!(
        sep.constant,
        Some(ConstantName::Resolved("DIRECTORY_SEPARATOR".to_owned()))
    );

    let namespace = registry.namespace(SHAPES_FILE, "App");
    assert_eq!(namespace.constant("DOUBLE", &registry)?, Some(Val::Int(20)));
    Ok(())
}

#[test]
fn test_undefined_constant_uses_its_name() -> Result<()> {
    let registry = shapes();
    let unknown = helper_default(&registry, "unknown")?;
    assert_eq!(unknown.value, Val::from("UNKNOWN_THING"));
    assert_eq!(
        unknown.constant,
        Some(ConstantName::UnresolvedAsLiteral("UNKNOWN_THING".to_owned()))
    );
    Ok(())
}

#[test]
fn test_keyword_constants_are_not_named() -> Result<()> {
    let registry = shapes();
    let flag = helper_default(&registry, "flag")?;
    assert_eq!(flag.value, Val::Bool(true));
    assert!(!flag.is_constant());

    assert_eq!(eval_in_file(&Expr::constant("NULL"))?.value, Val::Null);
    Ok(())
}

#[test]
fn test_class_constants_in_method_scope() -> Result<()> {
    let registry = shapes();

    let size = area_default(&registry, "size")?;
    assert_eq!(size.value, Val::Int(4));
    assert_eq!(size.constant_name(), Some("self::SIDES"));

    let name = area_default(&registry, "name")?;
    assert_eq!(name.value, Val::from("shape"));
    assert_eq!(name.constant_name(), Some("parent::NAME"));

    let class = area_default(&registry, "class")?;
    assert_eq!(class.value, Val::from("App\\Square"));
    assert!(!class.is_constant());

    let parent = area_default(&registry, "parent")?;
    assert_eq!(parent.value, Val::from("App\\Shape"));
    Ok(())
}

#[test]
fn test_missing_class_constant_is_null() -> Result<()> {
    let registry = shapes();
    let missing = area_default(&registry, "missing")?;
    assert_eq!(missing.value, Val::Null);
    assert_eq!(missing.constant_name(), Some("self::MISSING"));
    Ok(())
}

#[test]
fn test_class_constant_initializers() -> Result<()> {
    let registry = shapes();
    let square = registry.class("App\\Square")?;

    assert_eq!(square.constant("LABEL", &registry)?, Some(Val::from("shape:4")));
    // Inherited through the parent's interface
    let shape = registry.class("App\\Shape")?;
    assert_eq!(shape.constant("SIDES", &registry)?, Some(Val::Int(0)));

    let constants = square.constants(&registry)?;
    assert_eq!(
        constants.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["SIDES", "LABEL", "NAME"]
    );
    Ok(())
}

#[test]
fn test_property_defaults() -> Result<()> {
    let registry = shapes();
    let square = registry.class("App\\Square")?;

    assert_eq!(square.property_default("sides", &registry)?, Some(Val::Int(0)));
    assert_eq!(square.property_default("$label", &registry)?, Some(Val::Null));
    assert_eq!(square.property_default("nothing", &registry)?, None);
    Ok(())
}

#[test]
fn test_relative_and_internal_class_names() -> Result<()> {
    let registry = shapes();

    let shape = helper_default(&registry, "shape")?;
    assert_eq!(shape.value, Val::from("shape"));
    assert_eq!(shape.constant_name(), Some("Shape::NAME"));

    let atom = helper_default(&registry, "atom")?;
    assert_eq!(atom.value, Val::from("Y-m-d\\TH:i:sP"));
    Ok(())
}

#[test]
fn test_fully_qualified_class_name_is_not_loaded() -> Result<()> {
    let expr = Expr::class_const("\\Vendor\\Nowhere", "class");
    assert_eq!(eval_in_file(&expr)?.value, Val::from("Vendor\\Nowhere"));
    Ok(())
}

#[test]
fn test_class_resolution_errors() -> Result<()> {
    let registry = shapes();
    let helper = registry.function("App\\helper")?;

    let lost = helper.parameter_default("lost", &registry);
    assert!(matches!(lost, Err(ReflectionError::ClassNotFound(ref name)) if name == "App\\Missing"));

    let orphan = helper.parameter_default("orphan", &registry);
    assert!(matches!(orphan, Err(ReflectionError::UnresolvableClass { .. })));

    let shape = registry.class("App\\Shape")?;
    let describe = shape.method("describe").expect("describe is declared");
    let err = describe
        .parameter_default("name", &registry)
        .expect_err("Shape has no parent");
    assert_eq!(
        err.to_string(),
        "Can not resolve class parent: class App\\Shape has no parent"
    );
    Ok(())
}

#[test]
fn test_missing_parameters_have_no_default() -> Result<()> {
    let registry = shapes();
    let helper = registry.function("App\\helper")?;
    assert_eq!(helper.parameter_default("plain", &registry)?, None);
    assert_eq!(helper.parameter_default("absent", &registry)?, None);
    Ok(())
}

#[test]
fn test_magic_constants_follow_the_subject() -> Result<()> {
    let registry = shapes();
    let square = registry.class("App\\Square")?;
    let area = square.method("area").expect("area is declared");
    let helper = registry.function("App\\helper")?;

    let in_method = |kind| evaluate(&Expr::magic(kind), Subject::Method(&area), &registry);
    assert_eq!(in_method(MagicConstKind::Class)?.value, Val::from("App\\Square"));
    assert_eq!(in_method(MagicConstKind::Method)?.value, Val::from("App\\Square::area"));
    assert_eq!(in_method(MagicConstKind::Function)?.value, Val::from("area"));
    assert_eq!(in_method(MagicConstKind::Namespace)?.value, Val::from("App"));
    assert_eq!(in_method(MagicConstKind::File)?.value, Val::from(SHAPES_FILE));
    assert_eq!(in_method(MagicConstKind::Dir)?.value, Val::from("/src/App"));
    assert_eq!(in_method(MagicConstKind::Trait)?.value, Val::from(""));

    let in_function = |kind| evaluate(&Expr::magic(kind), Subject::Function(&helper), &registry);
    assert_eq!(in_function(MagicConstKind::Function)?.value, Val::from("App\\helper"));
    assert_eq!(in_function(MagicConstKind::Method)?.value, Val::from(""));
    assert_eq!(in_function(MagicConstKind::Class)?.value, Val::from(""));

    let func = helper_default(&registry, "func")?;
    assert_eq!(func.value, Val::from("App\\helper"));
    assert!(!func.is_constant());
    Ok(())
}

#[test]
fn test_magic_constants_in_class_namespace_and_file_scope() -> Result<()> {
    let file_name = "/src/App/Traits/Sided.php";
    let registry = registry_with(
        file_name,
        vec![namespace(
            "App\\Traits",
            vec![
                const_decl("HERE", Expr::magic(MagicConstKind::Namespace)),
                ClassFixture::trait_("Sided")
                    .constant("TRAIT", Expr::magic(MagicConstKind::Trait))
                    .constant("CLASS", Expr::magic(MagicConstKind::Class))
                    .build(),
                ClassFixture::class("Polygon")
                    .constant("CLASS", Expr::magic(MagicConstKind::Class))
                    .constant("TRAIT", Expr::magic(MagicConstKind::Trait))
                    .build(),
            ],
        )],
    );

    let sided = registry.class("App\\Traits\\Sided")?;
    assert_eq!(sided.constant("TRAIT", &registry)?, Some(Val::from("App\\Traits\\Sided")));
    assert_eq!(sided.constant("CLASS", &registry)?, Some(Val::from("App\\Traits\\Sided")));

    let polygon = registry.class("App\\Traits\\Polygon")?;
    assert_eq!(polygon.constant("CLASS", &registry)?, Some(Val::from("App\\Traits\\Polygon")));
    assert_eq!(polygon.constant("TRAIT", &registry)?, Some(Val::from("")));

    let namespace = registry.namespace(file_name, "App\\Traits");
    assert_eq!(namespace.constant("HERE", &registry)?, Some(Val::from("App\\Traits")));
    let in_namespace = evaluate(
        &Expr::magic(MagicConstKind::Namespace),
        Subject::Namespace(&namespace),
        &registry,
    )?;
    assert_eq!(in_namespace.value, Val::from("App\\Traits"));

    let file = registry.file(file_name).expect("file is indexed");
    let in_file = |kind| evaluate(&Expr::magic(kind), Subject::File(&file), &registry);
    assert_eq!(in_file(MagicConstKind::File)?.value, Val::from(file_name));
    assert_eq!(in_file(MagicConstKind::Dir)?.value, Val::from("/src/App/Traits"));
    assert_eq!(in_file(MagicConstKind::Class)?.value, Val::from(""));
    assert_eq!(in_file(MagicConstKind::Namespace)?.value, Val::from(""));
    Ok(())
}

#[test]
fn test_self_referencing_class_constants() -> Result<()> {
    let cyclic = ClassFixture::class("Cycle")
        .constant("A", Expr::class_const("self", "B"))
        .constant("B", Expr::class_const("self", "A"))
        .build();
    let registry = registry_with("/src/Cycle.php", vec![cyclic]);
    let class = registry.class("Cycle")?;

    let err = class
        .constant("A", &registry)
        .expect_err("cycle is detected");
    assert!(matches!(err, ReflectionError::SelfReferencingConstant(_)));
    Ok(())
}
