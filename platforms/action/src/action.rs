use keymap::KeyMap;

#[derive(KeyMap, Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Quit the application
    #[key("q")]
    Quit,
    /// Rebuild the tape from the last input
    #[key("r")]
    Reset,
    /// Apply a single transition
    #[key("space")]
    Step,
    /// Validate the table and start running automatically
    #[key("enter")]
    Run,
    /// Check the transition table without running it
    #[key("v")]
    Validate,
    /// Pause or resume auto-play
    #[key("p")]
    ToggleAutoPlay,
    /// Toggle help display
    #[key("h")]
    ToggleHelp,
    /// Load the previous program
    #[key("left")]
    PreviousProgram,
    /// Load the next program
    #[key("right")]
    NextProgram,
    /// Shorten the delay between automatic steps
    #[key("up")]
    SpeedUp,
    /// Lengthen the delay between automatic steps
    #[key("down")]
    SlowDown,
}
