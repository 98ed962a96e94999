use serde_sexpr::{sexpr, Expression, Number};

fn num(text: &str) -> Expression {
    Expression::Number(Number::from_literal(text))
}

#[test]
fn test_sexpr_macro_booleans() {
    assert_eq!(sexpr!(true), Expression::True);
    assert_eq!(sexpr!(false), Expression::False);
}

#[test]
fn test_sexpr_macro_numbers() {
    assert_eq!(sexpr!(42), num("42"));
    assert_eq!(sexpr!(3.5), num("3.5"));
    assert_eq!(sexpr!({ -123 }), num("-123"));
    assert_eq!(sexpr!(18446744073709551615u64), num("18446744073709551615"));
}

#[test]
fn test_sexpr_macro_strings() {
    assert_eq!(sexpr!("hello world"), Expression::from("hello world"));
    assert_eq!(sexpr!(""), Expression::from(""));
    assert_eq!(sexpr!('c'), Expression::from("c"));
}

#[test]
fn test_sexpr_macro_identifiers() {
    assert_eq!(sexpr!(lambda), Expression::identifier("lambda"));
    assert_eq!(sexpr!(*), Expression::identifier("*"));
    assert_eq!(sexpr!(<=), Expression::identifier("<="));
}

#[test]
fn test_sexpr_macro_lists() {
    assert_eq!(sexpr!(()), Expression::List(vec![]));

    let mixed = sexpr!((1 "hello" true ()));
    assert_eq!(
        mixed,
        Expression::List(vec![
            num("1"),
            Expression::from("hello"),
            Expression::True,
            Expression::default(),
        ])
    );
}

#[test]
fn test_sexpr_macro_nested() {
    let program = sexpr!((define (square x) (* x x)));
    assert_eq!(program.to_string(), "(define (square x) (* x x))");
    assert_eq!(program.tail().map(<[Expression]>::len), Some(2));
}

#[test]
fn test_sexpr_macro_splices_serializable_values() {
    #[derive(serde::Serialize)]
    struct Size {
        w: u16,
        h: u16,
    }

    let size = Size { w: 640, h: 480 };
    let scale = 1.25;
    let form = sexpr!((resize {size} {scale}));
    assert_eq!(form.to_string(), "(resize (640 480) 1.25)");
}
