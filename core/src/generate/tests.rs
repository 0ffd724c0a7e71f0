//! Generation tests - target text and parenthesization

use maplit::hashmap;

use crate::config::GenerateConfig;
use crate::context::{Context, SymbolTable, Verbatim};
use crate::parser;

fn condition(source: &str) -> String {
    generate_condition(source, &Verbatim)
}

fn generate_condition<C: Context>(source: &str, ctx: &C) -> String {
    let condition = parser::parse_condition(source).expect("Should parse");
    let mut out = String::new();
    condition.generate(ctx, &mut out);
    out
}

fn script(source: &str) -> String {
    generate_script(source, &Verbatim)
}

fn generate_script<C: Context>(source: &str, ctx: &C) -> String {
    let statements = parser::parse_script(source).expect("Should parse");
    let mut out = String::new();
    for statement in &statements {
        statement.generate(ctx, &mut out);
    }
    out
}

/* ===================== Parenthesization ===================== */

#[test]
fn test_multi_operand_layers_are_wrapped() {
    assert_eq!(condition("1+2*3"), "(1+(2*3))");
    assert_eq!(condition("a*b"), "(a*b)");
    assert_eq!(condition("a-b-c"), "(a-b-c)");
    assert_eq!(condition("a/b*c+d"), "((a/b*c)+d)");
}

#[test]
fn test_single_operands_are_not_wrapped() {
    assert_eq!(condition("x"), "x");
    assert_eq!(condition("42"), "42");
    assert_eq!(condition("f(a, b + 1)"), "f(a,(b+1))");
}

#[test]
fn test_explicit_groups_keep_their_parentheses() {
    assert_eq!(condition("(x)"), "(x)");
    assert_eq!(condition("(a+b)+c"), "(((a+b))+c)");
    assert_eq!(condition("(a or b) and c"), "(a||b)&&c");
}

/* ===================== Boolean Layers ===================== */

#[test]
fn test_boolean_operators() {
    assert_eq!(condition("a = 1 or not b > 2 and c"), "a==1||!(b>2)&&c");
    assert_eq!(condition("not done"), "!(done)");
    assert_eq!(condition("x < y + 1"), "x<(y+1)");
}

#[test]
fn test_literals_are_emitted_unchanged() {
    assert_eq!(condition(r#"name = "a \"q\"""#), r#"name=="a \"q\"""#);
    assert_eq!(condition("true or false"), "true||false");
    assert_eq!(condition("007"), "007");
}

/* ===================== Statements ===================== */

#[test]
fn test_statements() {
    assert_eq!(script("var x = 1"), "var x=1;");
    assert_eq!(script("x = x + 1"), "x=(x+1);");
    assert_eq!(script("notify()"), "notify();");
    assert_eq!(script("if a and b then go(a) end"), "if(a&&b){go(a);}");
    assert_eq!(
        script("for i=0; i<5; i=i+1 do call(i) end"),
        "for(var i=0;i<5;i=(i+1)){call(i);}"
    );
    assert_eq!(
        script("def add(a, b) var c = a + b return c end"),
        "function add(a,b){var c=(a+b);return c;}"
    );
    assert_eq!(script("def noop() end"), "function noop(){}");
}

#[test]
fn test_symbol_resolution() {
    let config = GenerateConfig {
        prefix: Some("vars.".to_string()),
        symbols: hashmap! {
            "count".to_string() => "state.count".to_string(),
        },
    };
    let ctx = SymbolTable::from_config(&config);

    assert_eq!(generate_condition("count > limit", &ctx), "state.count>vars.limit");
    // callee names are not resolved, their arguments are
    assert_eq!(generate_condition("max(count, 1)", &ctx), "max(state.count,1)");
    // a declaration the context maps elsewhere becomes a plain assignment
    assert_eq!(generate_script("var count = 0", &ctx), "state.count=0;");
    assert_eq!(generate_script("count = count + 1", &ctx), "state.count=(state.count+1);");
}

#[test]
fn test_definition_parameters_are_not_resolved() {
    let ctx = SymbolTable::new().with_prefix("vars.");

    assert_eq!(
        generate_script("def f(a) return a + 1 end", &ctx),
        "function f(a){return (a+1);}"
    );
    // free names in the body still resolve; inner parameters shadow only inside
    assert_eq!(
        generate_script("def f(a) def g(b) return a + b + c end x = b return g(a) end", &ctx),
        "function f(a){function g(b){return (a+b+vars.c);}vars.x=vars.b;return g(a);}"
    );
}

/* ===================== Workflow ===================== */

#[test]
fn test_actions_and_guards() {
    let workflow = parser::parse(
        r#"
        workflow w
          state s
            enter a = 1 log(a) end
            transition to t if a > 0
            transition to u
          end
        end
        "#,
    )
    .expect("Should parse");
    let node = &workflow.nodes[0];

    let mut out = String::new();
    node.actions[0].generate(&Verbatim, &mut out);
    assert_eq!(out, "a=1;log(a);");

    let guards: Vec<String> = node
        .transitions
        .iter()
        .map(|t| {
            let mut guard = String::new();
            t.generate_guard(&Verbatim, &mut guard);
            guard
        })
        .collect();
    assert_eq!(guards, vec!["a>0", "true"]);
}

#[test]
fn test_concurrent_generation_over_shared_tree() {
    let workflow = parser::parse("workflow w node n transition to m if x * 2 > y end end")
        .expect("Should parse");
    let transition = &workflow.nodes[0].transitions[0];

    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut out = String::new();
                    transition.generate_guard(&Verbatim, &mut out);
                    out
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("Should not panic"))
            .collect()
    });

    assert!(results.iter().all(|r| r == "(x*2)>y"));
}
