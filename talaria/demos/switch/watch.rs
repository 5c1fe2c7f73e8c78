//! Watches a switch on pin 5 and reports every state change. The mock protocol never
//! sees a real finger, so the demo flips the pin value itself to simulate presses.

use talaria::devices::{Switch, SwitchEvent};
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a Switch on pin 5.
        let switch = Switch::new(&board, 5)?;

        // Triggered function when the switch state changes.
        switch.on(SwitchEvent::OnChange, |value: bool| async move {
            println!("Switch value changed: {}", value);
            Ok(())
        });

        // Triggered function when the switch closes.
        switch.on(SwitchEvent::OnClose, |_: ()| async move {
            println!("Switch closed");
            Ok(())
        });

        // Triggered function when the switch opens.
        switch.on(SwitchEvent::OnOpen, |_: ()| async move {
            println!("Switch opened");
            Ok(())
        });

        // Simulated presses.
        for _ in 0..2 {
            pause!(500);
            board.get_data().write().get_pin_mut(5)?.value = 1;
            pause!(500);
            board.get_data().write().get_pin_mut(5)?.value = 0;
        }

        pause!(500);
        switch.detach();

        Ok(())
    });
}
