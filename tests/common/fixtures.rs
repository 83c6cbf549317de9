//! Reusable test content.

/// Service config referencing two upstream stacks, one of them three times
pub const SERVICE_CONFIG: &str = r#"service: orders-api

provider:
  name: aws
  runtime: nodejs20.x
  environment:
    VPC_ID: ${ssm:/vpc-stack/vpc-id}
    SUBNETS: ${ssm:/vpc-stack/private-subnets}
    SECURITY_GROUP: ${cf:vpc-stack.SecurityGroupId}
    DB_HOST: ${cf:${self:service}-${opt:stage}-db-stack.DbHost}

functions:
  create:
    handler: src/create.handler
"#;

/// Control plane fixture matching `SERVICE_CONFIG`
pub const CONTROL_PLANE_FIXTURE: &str = r#"stacks:
  - name: vpc-stack
    region: us-east-1
    status: UPDATE_COMPLETE
    outputs:
      VpcId: vpc-0abc
      SecurityGroupId: sg-0123
  - name: db-stack
    region: us-east-1
    status: CREATE_COMPLETE
    outputs:
      DbHost: db.internal
    tags:
      Dependencies: vpc-stack
  - name: legacy-stack
    region: us-east-1
    status: UPDATE_ROLLBACK_COMPLETE
parameters:
  /vpc-stack/private-subnets: subnet-1,subnet-2
errors:
  locked-stack: "An error occurred (AccessDenied) when calling the DescribeStacks operation"
"#;
