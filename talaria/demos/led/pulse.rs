use talaria::devices::Led;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a LED on pin 11: pulsing requires a PWM capable pin.
        let mut led = Led::new(&board, 11, false)?;

        // Breathe in and out every second (for 5 seconds).
        led.pulse(1000)?;
        pause!(5000);

        led.stop();
        led.off()?;

        Ok(())
    });
}
