use crate::ElfId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalorieError {
    #[error("N needs to be between {min} and {max}, inclusively, got {n}")]
    InvalidTopN { n: usize, min: usize, max: usize },

    #[error("line {line}: calorie value {value} does not fit in 64 bits")]
    ValueTooLarge { line: usize, value: String },

    #[error("line {line}: total calories of elf #{elf} overflowed")]
    TotalOverflow { line: usize, elf: ElfId },

    #[error("combined calories of the top elves overflowed")]
    CombinedOverflow,
}
