#[cfg(test)]
mod tests {
    use crate::Preview::editor::{EditorButton, MathEditor};
    use crate::Preview::mode_classifier::Mode;
    use crate::Preview::session::{Calculator, PreviewOutcome, QuantityTarget, Session};
    use crate::Rendering::bidirectional_sync::SyncOutcome;
    use crate::Rendering::precision::selectors;
    use crate::Rendering::result_renderer::{InitialInputs, ResultView, TotalsOutcome};
    use crate::Service::mock_service::MockService;
    use crate::Service::service_api::{MassMoleEquationResponse, QuantityKind};
    use serde_json::{Value, json};

    const WATER_FORMATION: &str = "H_2 + O_2 \\rightarrow H_2O";

    fn hydrogen() -> Value {
        json!({
            "mode": "molecule", "syntax": true, "error": null,
            "molecule": {"H": 2},
            "info": {"mr": 2.01588, "element_percentages": {"H": 100.0}, "oxidation": {"H": "0"}}
        })
    }

    fn water() -> Value {
        json!({
            "mode": "molecule", "syntax": true, "error": null,
            "molecule": {"H": 2, "O": 1},
            "info": {
                "mr": 18.01528,
                "element_percentages": {"H": 11.19, "O": 88.81},
                "oxidation": {"H": "1", "O": "-2"}
            }
        })
    }

    fn water_formation() -> Value {
        json!({
            "mode": "equation", "syntax": true, "error": null,
            "parsed": [["H_2", "O_2"], ["H_2O"]],
            "reaction_type": "synthesis",
            "reactants": ["H_2", "O_2"],
            "products": ["H_2O"],
            "coefficients": [2, 1, 2],
            "mr": [2.01588, 31.9988, 18.01528]
        })
    }

    fn calculator(service: MockService) -> Calculator<MockService> {
        Calculator::new(service, Session::new("", 2, InitialInputs::default()))
    }

    #[tokio::test]
    async fn test_water_formation_scenario() {
        let service = MockService::new().with_preview(WATER_FORMATION, water_formation());
        let calc = Calculator::new(
            service,
            Session::new(WATER_FORMATION, 2, InitialInputs::default()),
        );
        assert_eq!(calc.refresh().await, PreviewOutcome::Applied);
        let session = calc.session();
        assert_eq!(session.mode(), Mode::Equation);
        let equation = session.view().as_equation().unwrap();
        let texts: Vec<&str> = equation.cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["H_2", "+", "O_2", "\\rightarrow", "H_2O"]);
        assert!(session.status().syntax_ok);
    }

    #[tokio::test]
    async fn test_out_of_order_answers_keep_latest_view() {
        let service = MockService::new()
            .with_preview("H_2", hydrogen())
            .with_preview("H_2O", water());
        let release_first = service.gate("H_2");
        let calc = calculator(service);

        let first = calc.edit_expression("H_2");
        let second = async {
            let outcome = calc.edit_expression("H_2O").await;
            release_first.send(()).unwrap();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(second, PreviewOutcome::Applied);
        assert_eq!(first, PreviewOutcome::Stale);
        let session = calc.session();
        assert_eq!(session.expression(), "H_2O");
        assert_eq!(session.precision().display("mr"), Some("18.02"));
        assert_eq!(calc.service().calls_to("live_preview"), 2);
    }

    #[tokio::test]
    async fn test_informal_arrow_is_normalized_in_editor() {
        let calc = calculator(MockService::new());
        calc.edit_expression("H_2 + O_2 -> H_2O").await;
        let session = calc.session();
        assert_eq!(session.expression(), "H_2 + O_2\\rightarrow H_2O");
        assert_eq!(session.mode(), Mode::Equation);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_previous_view() {
        let calc = calculator(MockService::new().with_preview("H_2O", water()));
        calc.edit_expression("H_2O").await;
        *calc.service().fail_transport.lock().unwrap() = true;
        assert_eq!(
            calc.edit_expression("H_2O_2").await,
            PreviewOutcome::TransportFailed
        );
        {
            let session = calc.session();
            assert!(matches!(session.view(), ResultView::Molecule(_)));
            assert_eq!(session.mode(), Mode::Molecule);
            assert!(session.status().message.is_some());
        }
        *calc.service().fail_transport.lock().unwrap() = false;
        calc.edit_expression("H_2O").await;
        assert!(calc.session().status().message.is_none());
    }

    #[tokio::test]
    async fn test_syntax_flag_follows_answers() {
        let service = MockService::new().with_preview(
            "H_2(",
            json!({"mode": "molecule", "syntax": false, "error": "Unbalanced bracket"}),
        );
        let calc = calculator(service);
        calc.edit_expression("H_2(").await;
        {
            let session = calc.session();
            assert!(!session.status().syntax_ok);
            assert!(matches!(session.view(), ResultView::Error(_)));
        }
        calc.edit_expression("").await;
        let session = calc.session();
        assert!(session.status().syntax_ok);
        assert_eq!(session.mode(), Mode::This);
        assert!(matches!(session.view(), ResultView::Placeholder(_)));
    }

    #[tokio::test]
    async fn test_button_inserts_command_and_previews() {
        let calc = Calculator::new(
            MockService::new(),
            Session::new("H_2", 2, InitialInputs::default()),
        );
        assert_eq!(
            calc.press_button(EditorButton::RightArrow).await,
            PreviewOutcome::Applied
        );
        let session = calc.session();
        assert_eq!(session.expression(), "H_2\\rightarrow ");
        assert!(session.editor().is_focused());
        assert_eq!(session.mode(), Mode::Equation);
    }

    #[tokio::test]
    async fn test_molecule_quantity_round_trip() {
        let service = MockService::new()
            .with_preview("H_2O", water())
            .with_molar_mass("H_2O", 18.0);
        let calc = Calculator::new(
            service,
            Session::new(
                "",
                2,
                InitialInputs {
                    mass: "9".to_string(),
                    mole: String::new(),
                },
            ),
        );
        calc.edit_expression("H_2O").await;
        let outcome = calc
            .edit_quantity(QuantityTarget::molecule(QuantityKind::Mole), "2")
            .await;
        assert!(matches!(outcome, Some(SyncOutcome::Updated { kind: QuantityKind::Mass, .. })));
        let session = calc.session();
        let ResultView::Molecule(molecule) = session.view() else {
            panic!("expected a molecule view");
        };
        assert_eq!(molecule.pair.mass(), "36.0");
        assert_eq!(molecule.pair.mole(), "2");
        // no reaction totals outside equation mode
        assert_eq!(calc.service().calls_to("mass_mole_equation"), 0);
    }

    #[tokio::test]
    async fn test_quantity_edit_without_field() {
        let calc = calculator(MockService::new());
        calc.edit_expression("").await;
        let outcome = calc
            .edit_quantity(QuantityTarget::species(0, QuantityKind::Mass), "1")
            .await;
        assert!(outcome.is_none());
        assert_eq!(calc.service().calls_to("mass_mole"), 0);
    }

    #[tokio::test]
    async fn test_equation_totals_follow_conversion() {
        let service = MockService::new()
            .with_preview(WATER_FORMATION, water_formation())
            .with_molar_mass("H_2", 2.0)
            .with_equation_answer(MassMoleEquationResponse {
                reaction_masses: vec![json!(4.0), json!(32.0), json!(36.0)],
                reaction_moles: vec![json!(2.0), json!(1.0), json!(2.0)],
            });
        let calc = calculator(service);
        calc.edit_expression(WATER_FORMATION).await;
        let outcome = calc
            .edit_quantity(QuantityTarget::species(0, QuantityKind::Mass), "4")
            .await;
        assert!(matches!(outcome, Some(SyncOutcome::Updated { .. })));

        let requests = calc.service().equation_requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].mass_array, vec!["4", "", ""]);
        assert_eq!(requests[0].mole_array, vec!["2.0", "", ""]);
        assert_eq!(requests[0].components, json!([["H_2", "O_2"], ["H_2O"]]));

        let session = calc.session();
        let equation = session.view().as_equation().unwrap();
        assert_eq!(equation.species[2].total_mass, "36.0");
        assert_eq!(equation.species[0].total_mole, "2.0");
    }

    #[tokio::test]
    async fn test_equation_totals_follow_corrected_input() {
        let service = MockService::new().with_preview(WATER_FORMATION, water_formation());
        let calc = calculator(service);
        calc.edit_expression(WATER_FORMATION).await;
        let outcome = calc
            .edit_quantity(QuantityTarget::species(1, QuantityKind::Mass), "32g")
            .await;
        assert_eq!(
            outcome,
            Some(SyncOutcome::Corrected {
                kind: QuantityKind::Mass,
                text: "32".to_string()
            })
        );
        assert_eq!(calc.service().calls_to("mass_mole_equation"), 1);
        let requests = calc.service().equation_requests.lock().unwrap().clone();
        assert_eq!(requests[0].mass_array, vec!["", "32", ""]);
    }

    #[tokio::test]
    async fn test_equation_totals_follow_failed_conversion() {
        let service = MockService::new().with_preview(WATER_FORMATION, water_formation());
        let calc = calculator(service);
        calc.edit_expression(WATER_FORMATION).await;
        *calc.service().fail_transport.lock().unwrap() = true;
        let outcome = calc
            .edit_quantity(QuantityTarget::species(0, QuantityKind::Mole), "1")
            .await;
        assert_eq!(outcome, Some(SyncOutcome::Failed));
        assert_eq!(calc.service().calls_to("mass_mole_equation"), 1);
    }

    #[tokio::test]
    async fn test_conversion_for_replaced_view_is_dropped() {
        let service = MockService::new()
            .with_preview(WATER_FORMATION, water_formation())
            .with_molar_mass("H_2", 2.0);
        let calc = calculator(service);
        calc.edit_expression(WATER_FORMATION).await;
        let edit = calc
            .session_mut()
            .begin_quantity_edit(QuantityTarget::species(0, QuantityKind::Mass), "4")
            .unwrap();
        calc.edit_expression(WATER_FORMATION).await;
        let outcome = calc
            .session_mut()
            .apply_quantity(&edit, Ok(Default::default()));
        assert_eq!(outcome, SyncOutcome::Stale);
        let totals = calc.update_totals().await;
        assert_eq!(totals, Some(TotalsOutcome::Applied));
    }

    #[tokio::test]
    async fn test_precision_change_rounds_through_service() {
        let calc = calculator(MockService::new().with_preview("H_2O", water()));
        calc.edit_expression("H_2O").await;
        let applied = calc.set_precision(selectors::PERCENTAGES, 0).await;
        assert_eq!(applied, 2);
        assert_eq!(calc.service().calls_to("round"), 2);
        {
            let session = calc.session();
            assert_eq!(session.precision().display("percentage:O"), Some("89"));
            assert_eq!(session.precision().display("mr"), Some("18.02"));
        }
        // a new view keeps the selected precision
        calc.edit_expression("H_2O").await;
        assert_eq!(
            calc.session().precision().display("percentage:H"),
            Some("11")
        );
    }
}
