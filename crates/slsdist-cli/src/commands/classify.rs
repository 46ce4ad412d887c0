use console::Style;
use miette::Result;
use slsdist_core::version;

/// Print the grammar flags for `input`, most specific kind first.
pub fn exec(input: &str) -> Result<()> {
    let kind = version::classify(input);
    let bold = Style::new().bold();
    println!("{}: {}", bold.apply_to(input), kind);

    let flags = [
        ("orderable", version::is_orderable(input)),
        ("non-orderable", version::is_non_orderable(input)),
        ("matcher", version::is_matcher(input)),
        ("valid", version::is_valid(input)),
    ];
    for (name, value) in flags {
        println!("  {name:<14} {value}");
    }
    Ok(())
}
