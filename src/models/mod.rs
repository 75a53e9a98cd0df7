pub mod book;
pub mod loan;
pub mod member;

pub use book::Book;
pub use loan::{LoanDto, LoanStatus, LoanWithDetails};
pub use member::MemberDto;
