use crossterm::event;
use std::io;
use std::sync::mpsc::{self, Receiver};

#[derive(Debug)]
pub enum InputMessage {
    Event(crossterm::event::Event),
    ReadError(String),
}

pub type InputReceiver = Receiver<InputMessage>;

/// Reads terminal events on a dedicated thread so the render loop never
/// blocks on input.
pub fn spawn_input_thread() -> io::Result<InputReceiver> {
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("donut-input".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(InputMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.send(InputMessage::ReadError(err.to_string()));
                    break;
                }
            }
        })?;
    Ok(rx)
}
