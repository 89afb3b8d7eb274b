#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use rust_decimal::Decimal;

    #[test]
    fn test_net_profit() {
        use crate::commands::farm::net_profit;

        let income = Decimal::new(10000, 2); // 100.00
        let expenses = Decimal::new(4000, 2); // 40.00
        assert_eq!(net_profit(income, expenses), Decimal::new(6000, 2));

        assert_eq!(net_profit(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);

        // More expenses than income goes negative, never saturates.
        let loss = net_profit(Decimal::new(500, 2), Decimal::new(1500, 2));
        assert_eq!(loss, Decimal::new(-1000, 2));
    }

    #[test]
    fn test_cycle_profit() {
        use crate::commands::plot::cycle_profit;

        let revenue = Decimal::new(250050, 2); // 2500.50
        let expenses = Decimal::new(100025, 2); // 1000.25
        assert_eq!(cycle_profit(revenue, expenses), Decimal::new(150025, 2));
        assert_eq!(cycle_profit(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_constraint_field_mapping() {
        use crate::error::constraint_field;

        assert_eq!(constraint_field("livestock_tag_number_key"), "tag_number");
        assert_eq!(constraint_field("users_username_key"), "username");
        assert_eq!(constraint_field("users_email_key"), "email");
        assert_eq!(constraint_field("employees_user_id_key"), "user_id");
        assert_eq!(constraint_field("employees_user_id_fkey"), "user_id");
        assert_eq!(constraint_field("vehicles_assigned_to_fkey"), "assigned_to");
        assert_eq!(constraint_field("planting_cycles_crop_id_fkey"), "crop_id");
        assert_eq!(
            constraint_field("maintenance_records_vehicle_id_fkey"),
            "vehicle_id"
        );
        // Unrecognized constraints fall through with suffix stripped.
        assert_eq!(constraint_field("something_else"), "something_else");
    }

    fn validation_fields(err: crate::error::AgribaseError) -> Vec<String> {
        match err {
            crate::error::AgribaseError::Validation(errors) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_transaction_input_validation() {
        use crate::commands::transaction::TransactionInput;

        let input = TransactionInput {
            farm_id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: "Seed purchase".to_string(),
            amount: Decimal::new(-100, 0),
            kind: "transfer".to_string(),
            category: "supplies".to_string(),
            status: "completed".to_string(),
            reference_number: None,
        };

        let fields = validation_fields(input.validate().unwrap_err());
        assert!(fields.contains(&"amount".to_string()));
        assert!(fields.contains(&"type".to_string()));
    }

    #[test]
    fn test_farm_input_validation() {
        use crate::commands::farm::FarmInput;

        let input = FarmInput {
            name: "   ".to_string(),
            address: "1 Rural Road".to_string(),
            total_area: Decimal::new(50, 0),
        };
        let fields = validation_fields(input.validate().unwrap_err());
        assert_eq!(fields, vec!["name".to_string()]);

        let ok = FarmInput {
            name: "North Farm".to_string(),
            address: "1 Rural Road".to_string(),
            total_area: Decimal::new(50, 0),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_plot_input_soil_type_validation() {
        use crate::commands::plot::PlotInput;

        let input = PlotInput {
            farm_id: 1,
            name: "East plot".to_string(),
            size: Decimal::new(25, 1),
            location: "east field".to_string(),
            soil_type: "volcanic".to_string(),
            irrigation_type: "drip".to_string(),
            coordinates: None,
            description: None,
            is_active: None,
        };

        let fields = validation_fields(input.validate().unwrap_err());
        assert_eq!(fields, vec!["soil_type".to_string()]);
    }

    #[test]
    fn test_plot_input_irrigation_type_required() {
        use crate::commands::plot::PlotInput;

        let input = PlotInput {
            farm_id: 1,
            name: "East plot".to_string(),
            size: Decimal::new(25, 1),
            location: "east field".to_string(),
            soil_type: "loamy".to_string(),
            irrigation_type: "   ".to_string(),
            coordinates: None,
            description: None,
            is_active: None,
        };

        let fields = validation_fields(input.validate().unwrap_err());
        assert_eq!(fields, vec!["irrigation_type".to_string()]);
    }

    #[test]
    fn test_planting_cycle_status_validation() {
        use crate::commands::plot::PlantingCycleInput;

        let input = PlantingCycleInput {
            plot_id: 1,
            crop_id: 1,
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            expected_end_date: chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            actual_end_date: None,
            status: "abandoned".to_string(),
            yield_amount: None,
            expenses: Some(Decimal::new(-1, 0)),
            revenue: None,
            notes: None,
        };

        let fields = validation_fields(input.validate().unwrap_err());
        assert!(fields.contains(&"status".to_string()));
        assert!(fields.contains(&"expenses".to_string()));
    }

    #[test]
    fn test_field_errors_collector() {
        use crate::error::FieldErrors;

        let empty = FieldErrors::default();
        assert!(empty.is_empty());
        assert!(empty.into_result().is_ok());

        let mut errors = FieldErrors::default();
        errors.push("name", "must not be blank");
        assert!(!errors.is_empty());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_error_status_codes() {
        use crate::error::AgribaseError;
        use axum::http::StatusCode;

        let not_found = AgribaseError::NotFound.into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let row_not_found = AgribaseError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(row_not_found.status(), StatusCode::NOT_FOUND);

        let auth = AgribaseError::Auth("invalid username or password".to_string()).into_response();
        assert_eq!(auth.status(), StatusCode::UNAUTHORIZED);

        let validation = AgribaseError::validation("name", "must not be blank").into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let internal = AgribaseError::Internal("boom".to_string()).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_token_roundtrip() {
        use crate::middleware::auth::{get_jwt_secret, issue_token, Claims};
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let token = issue_token(42, "farmer_jane").expect("issue_token failed");
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(&get_jwt_secret()),
            &Validation::default(),
        )
        .expect("token did not decode");

        assert_eq!(data.claims.user_id, 42);
        assert_eq!(data.claims.username, "farmer_jane");
        assert_eq!(data.claims.sub, "42");
    }

    #[test]
    fn test_auth_input_validation() {
        use crate::commands::auth::RegisterInput;

        let input = RegisterInput {
            username: "jane".to_string(),
            email: Some("not-an-email".to_string()),
            password: "short".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
        };

        let fields = validation_fields(input.validate().unwrap_err());
        assert!(fields.contains(&"email".to_string()));
        assert!(fields.contains(&"password".to_string()));
    }
}
