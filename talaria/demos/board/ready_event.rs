use talaria::hardware::{Board, BoardEvent};
use talaria::mocks::protocol::MockIoProtocol;

#[talaria::runtime]
async fn main() {
    // Mock board: swap the protocol for whichever reaches your hardware.
    let board = Board::new(MockIoProtocol::default()).open();

    board.on(BoardEvent::OnReady, |board: Board| async move {
        println!("Board connected: {}", board);
        println!("Pins {:#?}", board.get_io().pins);
        Ok(())
    });
}
