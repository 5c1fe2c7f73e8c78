use talaria::devices::Led;
use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;
use talaria::pause;

#[talaria::runtime]
async fn main() {
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        // Register a LED on pin 11: fading requires a PWM capable pin.
        let mut led = Led::new(&board, 11, true)?;

        // Fade the LED out, then back in, one second each way.
        led.fade_out(1000)?;
        pause!(1500);
        led.fade_in(1000)?;
        pause!(1500);

        // Land on half brightness.
        led.fade(50, 1000)?;
        pause!(1500);

        led.off()?;

        Ok(())
    });
}
