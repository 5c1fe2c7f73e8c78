use talaria::devices::Led;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a LED on pin 13: OFF by default.
        let mut led = Led::new(&board, 13, false)?;

        // Blinks the LED every 500ms (for 5 seconds).
        led.blink(500)?;
        pause!(5000);

        // stop() freezes the LED in whatever state the blink left it.
        led.stop();
        led.off()?;

        Ok(())
    });
}
