//! Debug and inspection commands.

use alias_core::Location;
use anyhow::{Context, Result};
use console::style;
use std::cmp::Ordering;

fn parse(input: &str) -> Result<Location> {
    Location::parse(input).with_context(|| format!("Invalid location: {}", input))
}

/// Compare two locations and report their order and overlap.
pub fn compare(a: &str, b: &str) -> Result<()> {
    let a = parse(a)?;
    let b = parse(b)?;

    let symbol = match a.cmp(&b) {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{} {} {}", style(&a).cyan(), style(symbol).bold(), style(&b).cyan());

    let relation = if a.is_prefix_of(&b) && b.is_prefix_of(&a) {
        "same path"
    } else if a.is_prefix_of(&b) {
        "first contains second"
    } else if b.is_prefix_of(&a) {
        "second contains first"
    } else {
        "disjoint"
    };
    println!("  overlap:     {}", style(relation).yellow());
    println!("  same volume: {}", a.same_volume(&b));

    Ok(())
}

/// Show the parsed components of a location.
pub fn location(input: &str) -> Result<()> {
    let location = parse(input)?;

    println!("{}", style(&location).cyan().bold());
    if location.is_opaque() {
        println!("  {}", style("opaque (no path hierarchy)").dim());
        return Ok(());
    }
    println!("  scheme:    {}", location.scheme().unwrap_or("-"));
    println!("  authority: {}", location.authority().unwrap_or("-"));
    println!("  device:    {}", location.device().unwrap_or("-"));
    println!("  segments:  {:?}", location.segments());
    println!("  query:     {}", location.query().unwrap_or("-"));
    println!("  fragment:  {}", location.fragment().unwrap_or("-"));

    Ok(())
}
