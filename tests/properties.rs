//! Property tests: analyzer determinism and complexity monotonicity.

use proptest::prelude::*;
use testgen::{analyze, synthesize, FileRecord, Framework};

const CONTROL: [&str; 8] = [
    "if (x) {}",
    "else if (y) {}",
    "switch (z) {}",
    "case 1:",
    "for (;;) {}",
    "while (q) {}",
    "catch (e) {}",
    "a && b",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn analyze_is_deterministic(ref input in ".{0,500}") {
        prop_assert_eq!(analyze(input), analyze(input));
    }

    #[test]
    fn complexity_is_at_least_one(ref input in ".{0,500}") {
        prop_assert!(analyze(input).complexity >= 1);
    }

    #[test]
    fn complexity_grows_with_control_flow(ref input in "[a-z ;\n]{0,200}", idx in 0usize..CONTROL.len()) {
        let base = analyze(input).complexity;
        let extended = format!("{}\n{}", input, CONTROL[idx]);
        prop_assert!(analyze(&extended).complexity > base);
    }

    #[test]
    fn synthesis_is_deterministic(ref input in ".{0,300}") {
        let file = FileRecord::new("mod.js", "mod.js", "mod.js", input.clone());
        let analysis = analyze(input);
        for framework in [Framework::Jest, Framework::Vitest, Framework::Mocha] {
            let first = synthesize("mod", &analysis, framework, &file);
            let second = synthesize("mod", &analysis, framework, &file);
            prop_assert_eq!(first, second);
        }
    }
}
