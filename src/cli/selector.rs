use std::io::{self, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    style::{Attribute, Print, SetAttribute},
    terminal::{self, ClearType},
    ExecutableCommand, QueueableCommand,
};

use crate::core::models::cost::Layer;

pub struct SelectableLayer {
    pub layer: Layer,
    pub checked: bool,
}

/// RAII guard that restores terminal state on drop (even on panic).
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout().execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Returns `Ok(Some(selected))` on confirm, `Ok(None)` if not a TTY, `Err` on cancel/Ctrl-C.
pub fn interactive_select(items: &[SelectableLayer]) -> anyhow::Result<Option<Vec<Layer>>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    let _guard = RawModeGuard::enable()?;

    let mut checked: Vec<bool> = items.iter().map(|i| i.checked).collect();
    let mut cursor_pos: usize = 0;

    draw(items, &checked, cursor_pos)?;

    loop {
        if let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        {
            match (code, modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Esc, _)
                | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                    clear_ui(items.len())?;
                    anyhow::bail!("cancelled");
                }
                (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                    cursor_pos = cursor_pos.saturating_sub(1);
                }
                (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                    if cursor_pos + 1 < items.len() {
                        cursor_pos += 1;
                    }
                }
                (KeyCode::Char(' '), _) => {
                    checked[cursor_pos] = !checked[cursor_pos];
                }
                (KeyCode::Char('a'), KeyModifiers::NONE) => {
                    let all_checked = checked.iter().all(|&c| c);
                    for c in checked.iter_mut() {
                        *c = !all_checked;
                    }
                }
                (KeyCode::Enter, _) => {
                    clear_ui(items.len())?;
                    return Ok(Some(selected_layers(items, &checked)));
                }
                _ => {}
            }
            draw(items, &checked, cursor_pos)?;
        }
    }
}

fn selected_layers(items: &[SelectableLayer], checked: &[bool]) -> Vec<Layer> {
    items
        .iter()
        .zip(checked.iter())
        .filter(|(_, &c)| c)
        .map(|(item, _)| item.layer)
        .collect()
}

fn draw(items: &[SelectableLayer], checked: &[bool], cursor_pos: usize) -> io::Result<()> {
    let mut stdout = io::stdout();

    stdout
        .queue(cursor::MoveToColumn(0))?
        .queue(terminal::Clear(ClearType::FromCursorDown))?;

    stdout
        .queue(Print("Select layers to estimate\r\n"))?
        .queue(Print("\r\n"))?
        .queue(Print(
            "  Use arrow keys to navigate, space to toggle, enter to confirm\r\n",
        ))?
        .queue(Print("\r\n"))?;

    for (i, item) in items.iter().enumerate() {
        let marker = if i == cursor_pos { "> " } else { "  " };
        let check = if checked[i] { "X" } else { " " };

        if i == cursor_pos {
            stdout.queue(SetAttribute(Attribute::Reverse))?;
        }

        stdout.queue(Print(format!(
            "{marker}[{check}] {:<10} {}\r\n",
            item.layer.display_name(),
            item.layer.description()
        )))?;

        if i == cursor_pos {
            stdout.queue(SetAttribute(Attribute::Reset))?;
        }
    }

    let count = checked.iter().filter(|&&c| c).count();
    stdout
        .queue(Print("\r\n"))?
        .queue(Print(format!(
            "  {count} selected | enter: confirm | q: cancel\r\n"
        )))?;

    // header(4) + items + footer(2)
    let total_lines = items.len() + 5;
    stdout.queue(cursor::MoveUp(total_lines as u16 + 1))?;

    stdout.flush()?;
    Ok(())
}

fn clear_ui(item_count: usize) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout
        .queue(cursor::MoveToColumn(0))?
        .queue(terminal::Clear(ClearType::FromCursorDown))?;
    let total_lines = item_count + 6;
    for _ in 0..total_lines {
        stdout.queue(Print(format!("{:width$}\r\n", "", width = 66)))?;
    }
    stdout.queue(cursor::MoveUp(total_lines as u16))?;
    stdout
        .queue(cursor::MoveToColumn(0))?
        .queue(terminal::Clear(ClearType::FromCursorDown))?;
    stdout.flush()?;
    Ok(())
}

/// Every layer, pre-checked.
pub fn build_selectable_list() -> Vec<SelectableLayer> {
    Layer::all()
        .iter()
        .map(|layer| SelectableLayer {
            layer: *layer,
            checked: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_selectable_list_has_every_layer_checked() {
        let items = build_selectable_list();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|i| i.checked));
        assert_eq!(items[0].layer, Layer::Landing);
        assert_eq!(items[3].layer, Layer::Pb);
    }

    #[test]
    fn selected_layers_keeps_pipeline_order() {
        let items = build_selectable_list();
        let selected = selected_layers(&items, &[false, true, false, true]);
        assert_eq!(selected, vec![Layer::Raw, Layer::Pb]);
    }
}
