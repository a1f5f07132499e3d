//! Control-flow complexity score.

use super::patterns::patterns;

/// 1 plus every occurrence of `if(`, `else if`, `switch(`, `case `, `for(`,
/// `while(`, `catch(`, `&&` and `||`.
///
/// `else if (` counts twice: once as `else if` and once as `if (`.
pub fn calculate_complexity(content: &str) -> u32 {
    patterns()
        .complexity
        .iter()
        .map(|re| re.find_iter(content).count() as u32)
        .fold(1, u32::saturating_add)
}
