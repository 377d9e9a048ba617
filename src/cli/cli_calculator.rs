use super::cli_main::{prompt, report_preview};
use crate::Preview::editor::EditorButton;
use crate::Preview::mode_classifier::Mode;
use crate::Preview::session::{Calculator, QuantityTarget};
use crate::Rendering::bidirectional_sync::SyncOutcome;
use crate::Rendering::precision::MAX_PRECISION;
use crate::Rendering::text_view::TextView;
use crate::Service::service_api::{ComputeService, QuantityKind};
use std::io;
use tokio::runtime::Runtime;

pub fn show_view<S: ComputeService>(calc: &Calculator<S>) {
    let session = calc.session();
    let status = session.status();
    println!(
        "\x1b[34m\n=== {} [{}] ===\x1b[0m",
        session.view().title(),
        session.mode()
    );
    println!("{}", session.expression());
    if !status.syntax_ok {
        println!("\x1b[31mInvalid syntax\x1b[0m");
    }
    if let Some(message) = &status.message {
        println!("\x1b[31m{}\x1b[0m", message);
    }
    print!("{}", session.view().render_text(session.precision()));
}

pub fn buttons_menu<S: ComputeService>(runtime: &Runtime, calc: &Calculator<S>) -> io::Result<()> {
    println!("\n=== Insert symbol ===");
    for (i, button) in EditorButton::ALL.iter().enumerate() {
        println!("\x1b[33m{}. {}\x1b[0m", i + 1, button.label());
    }
    println!("\x1b[33m0. Back to main menu\x1b[0m");
    let choice = prompt("Enter your choice: ")?;
    let button = match choice.trim().parse::<usize>() {
        Ok(0) => return Ok(()),
        Ok(n) if n <= EditorButton::ALL.len() => EditorButton::ALL[n - 1],
        _ => {
            println!("Invalid choice. Please try again.");
            return Ok(());
        }
    };
    report_preview(runtime.block_on(calc.press_button(button)));
    show_view(calc);
    Ok(())
}

fn read_kind() -> io::Result<Option<QuantityKind>> {
    println!("\x1b[33m1. Mass / g\x1b[0m");
    println!("\x1b[33m2. Moles / mol\x1b[0m");
    let choice = prompt("Enter your choice: ")?;
    Ok(match choice.trim() {
        "1" => Some(QuantityKind::Mass),
        "2" => Some(QuantityKind::Mole),
        _ => None,
    })
}

fn read_species<S: ComputeService>(calc: &Calculator<S>) -> io::Result<Option<usize>> {
    {
        let session = calc.session();
        let Some(equation) = session.view().as_equation() else {
            return Ok(None);
        };
        for entry in equation.species.iter().filter(|e| e.pair.is_some()) {
            println!("\x1b[33m{}. {}\x1b[0m", entry.index, entry.formula);
        }
    }
    let choice = prompt("Species: ")?;
    Ok(choice.trim().parse::<usize>().ok())
}

pub fn quantity_menu<S: ComputeService>(runtime: &Runtime, calc: &Calculator<S>) -> io::Result<()> {
    println!("\n=== Mass / moles ===");
    let mode = calc.session().mode();
    let species = match mode {
        Mode::Molecule => None,
        Mode::Equation => match read_species(calc)? {
            Some(index) => Some(index),
            None => {
                println!("Invalid choice. Please try again.");
                return Ok(());
            }
        },
        _ => {
            println!("No mass or mole fields in {} mode", mode);
            return Ok(());
        }
    };
    let Some(kind) = read_kind()? else {
        println!("Invalid choice. Please try again.");
        return Ok(());
    };
    let text = prompt("Value: ")?;
    let target = QuantityTarget { species, kind };
    match runtime.block_on(calc.edit_quantity(target, text.trim())) {
        None => println!("No such field in the current result"),
        Some(SyncOutcome::Corrected { text, .. }) => {
            println!("\x1b[31mInvalid input, kept {:?}\x1b[0m", text)
        }
        Some(SyncOutcome::Failed) => println!("\x1b[31mThe service did not answer\x1b[0m"),
        Some(_) => {}
    }
    show_view(calc);
    Ok(())
}

pub fn precision_menu<S: ComputeService>(runtime: &Runtime, calc: &Calculator<S>) -> io::Result<()> {
    println!("\n=== Precision ===");
    let selectors: Vec<(String, u32)> = {
        let session = calc.session();
        let store = session.precision();
        store
            .selectors()
            .map(|s| (s.to_string(), store.precision_of(s)))
            .collect()
    };
    if selectors.is_empty() {
        println!("No rounded values in the current result");
        return Ok(());
    }
    for (i, (selector, precision)) in selectors.iter().enumerate() {
        println!("\x1b[33m{}. {} ({} decimals)\x1b[0m", i + 1, selector, precision);
    }
    let choice = prompt("Enter your choice: ")?;
    let Some((selector, _)) = choice
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| selectors.get(i))
    else {
        println!("Invalid choice. Please try again.");
        return Ok(());
    };
    let decimals = prompt("Decimals: ")?;
    match decimals.trim().parse::<u32>() {
        Ok(precision) if precision > MAX_PRECISION => {
            println!("At most {} decimals", MAX_PRECISION)
        }
        Ok(precision) => {
            let updated = runtime.block_on(calc.set_precision(selector, precision));
            println!("{} values updated", updated);
            show_view(calc);
        }
        Err(_) => println!("Not a number: {}", decimals.trim()),
    }
    Ok(())
}
