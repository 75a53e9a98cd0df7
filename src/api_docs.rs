use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::search_books,
        api::books::get_book,
        api::books::create_book,
        api::books::update_book,
        api::books::delete_book,
        api::members::list_members,
        api::members::get_member,
        api::members::create_member,
        api::members::update_member,
        api::members::delete_member,
        api::loan::list_loans,
        api::loan::get_loan,
        api::loan::create_loan,
        api::loan::update_loan,
        api::loan::return_loan,
        api::loan::revert_return,
        api::loan::cancel_loan,
        api::loan::refresh_statuses,
        api::inventory::audit_inventory,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::MemberDto,
            crate::models::LoanDto,
            crate::models::LoanWithDetails,
            crate::models::LoanStatus,
            crate::models::loan::CheckoutRequest,
            crate::models::loan::LoanUpdate,
            crate::services::LedgerDiscrepancy,
            api::error::ErrorBody,
        )
    ),
    tags(
        (name = "biblioteca", description = "Library catalog, members and loans")
    )
)]
pub struct ApiDoc;
